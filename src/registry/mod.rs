//! Service registry for the Aries lookup aggregator.
//!
//! The registry owns every known downstream service record: its unique name,
//! base address and liveness. Records are bulk-loaded from a backing store at
//! startup, admitted only after a liveness and identity probe, and re-probed
//! by a periodic heartbeat. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
