//! Adapter implementations of the lookup ports.

mod http;
pub mod memory;
mod registry;

pub use http::HttpDownstreamClient;
