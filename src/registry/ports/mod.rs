//! Port contracts for the service registry.

mod probe;
mod store;

pub use probe::LivenessProbe;
pub use store::{ServiceStore, ServiceStoreError, ServiceStoreResult};

#[cfg(test)]
pub(crate) use store::MockServiceStore;
