//! Shared world state for service registration BDD scenarios.

use std::sync::Arc;

use aries::registry::{
    adapters::memory::{InMemoryServiceStore, StaticLivenessProbe},
    domain::ServiceRecord,
    services::{AddServiceRequest, RegistryServiceResult, ServiceRegistry},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry type used by the BDD world.
pub type TestRegistry = ServiceRegistry<InMemoryServiceStore, StaticLivenessProbe, DefaultClock>;

/// Service details queued before registration.
pub struct PendingService {
    /// Claimed service name.
    pub name: String,
    /// Service base address.
    pub address: String,
}

/// Scenario world for service registration behaviour tests.
pub struct RegistrationWorld {
    /// Scripted liveness endpoints.
    pub probe: StaticLivenessProbe,
    /// The registry under test.
    pub registry: TestRegistry,
    /// Service queued for registration.
    pub pending: Option<PendingService>,
    /// Result of the last registration attempt.
    pub last_add_result: Option<RegistryServiceResult<ServiceRecord>>,
}

impl RegistrationWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let probe = StaticLivenessProbe::new();
        let registry = ServiceRegistry::new(
            Arc::new(InMemoryServiceStore::new()),
            Arc::new(probe.clone()),
            Arc::new(DefaultClock),
        );
        Self {
            probe,
            registry,
            pending: None,
            last_add_result: None,
        }
    }

    /// Returns the queued service as a registration request.
    pub fn pending_request(&self) -> Result<AddServiceRequest, eyre::Report> {
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no pending service in scenario world"))?;
        Ok(AddServiceRequest::new(&pending.name, &pending.address))
    }
}

impl Default for RegistrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
