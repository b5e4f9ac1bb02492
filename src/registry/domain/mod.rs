//! Domain model for registered downstream services.
//!
//! Service identity, validated names and addresses, liveness state and probe
//! values live here. Persistence and transport concerns remain outside this
//! boundary.

mod address;
mod error;
mod ids;
mod liveness;
mod probe;
mod record;

pub use address::BaseAddress;
pub use error::{ParseLivenessError, RegistryDomainError};
pub use ids::{ServiceId, ServiceName};
pub use liveness::Liveness;
pub use probe::{ProbeMode, ProbeOutcome, ProbeRequest};
pub use record::{NewServiceRecord, PersistedServiceData, ServiceRecord};
