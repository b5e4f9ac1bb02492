//! Registry orchestration services.

mod heartbeat;
mod registry;

pub use heartbeat::{HeartbeatHandle, spawn_heartbeat};
pub use registry::{
    AddServiceRequest, RegistryServiceError, RegistryServiceResult, ServiceRegistry, SweepSummary,
    UpdateServiceRequest,
};
