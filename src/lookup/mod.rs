//! Lookup fan-out for the Aries aggregator.
//!
//! One identifier is dispatched concurrently to every alive registered
//! service. Each answer, failure or timeout becomes exactly one
//! [`domain::LookupResult`], merged in arrival order into a single
//! [`domain::AggregateReport`]. Services that fail at the transport level
//! are demoted in the registry so later lookups skip them until the next
//! heartbeat revives them.
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
