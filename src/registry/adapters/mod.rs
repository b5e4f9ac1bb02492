//! Adapter implementations for the service registry ports.

pub mod file;
pub mod memory;

mod http_probe;

pub use http_probe::HttpLivenessProbe;
