//! In-memory adapters for registry tests and deterministic local runs.

mod probe;
mod store;

pub use probe::StaticLivenessProbe;
pub use store::InMemoryServiceStore;
