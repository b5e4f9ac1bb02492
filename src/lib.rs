//! Aries: identifier lookup aggregator.
//!
//! Aries keeps a registry of downstream catalog services and answers "who
//! knows about this identifier?" by asking every live service at once and
//! merging the answers into a single report.
//!
//! # Architecture
//!
//! Aries follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, HTTP, memory)
//!
//! # Modules
//!
//! - [`registry`]: Service records, liveness probing and the heartbeat
//! - [`lookup`]: Concurrent fan-out and result merging
//! - [`http`]: Inbound routes over the registry and the aggregator
//! - [`config`]: Layered runtime settings
//! - [`telemetry`]: Structured logging setup

pub mod config;
pub mod http;
pub mod lookup;
pub mod registry;
pub mod telemetry;

#[cfg(test)]
mod test_support;
