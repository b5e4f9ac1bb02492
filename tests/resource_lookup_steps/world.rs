//! Shared world state for resource lookup BDD scenarios.

use std::sync::Arc;

use aries::lookup::{
    adapters::memory::ScriptedDownstreamClient,
    domain::AggregateReport,
    services::{AggregatorSettings, LookupAggregator},
};
use aries::registry::{
    adapters::memory::{InMemoryServiceStore, StaticLivenessProbe},
    services::ServiceRegistry,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry type used by the BDD world.
pub type TestRegistry = ServiceRegistry<InMemoryServiceStore, StaticLivenessProbe, DefaultClock>;

/// Scenario world for resource lookup behaviour tests.
pub struct LookupWorld {
    /// Scripted liveness endpoints.
    pub probe: StaticLivenessProbe,
    /// Scripted downstream lookup endpoints.
    pub client: ScriptedDownstreamClient,
    /// Registry shared with the aggregator.
    pub registry: Arc<TestRegistry>,
    /// The aggregator under test.
    pub aggregator: LookupAggregator<TestRegistry, ScriptedDownstreamClient>,
    /// Report from the last lookup.
    pub last_report: Option<AggregateReport>,
}

impl LookupWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let probe = StaticLivenessProbe::new();
        let client = ScriptedDownstreamClient::new();
        let registry = Arc::new(ServiceRegistry::new(
            Arc::new(InMemoryServiceStore::new()),
            Arc::new(probe.clone()),
            Arc::new(DefaultClock),
        ));
        let aggregator = LookupAggregator::new(
            Arc::clone(&registry),
            Arc::new(client.clone()),
            AggregatorSettings::default(),
        );
        Self {
            probe,
            client,
            registry,
            aggregator,
            last_report: None,
        }
    }

    /// Returns the last lookup report.
    pub fn report(&self) -> Result<&AggregateReport, eyre::Report> {
        self.last_report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no lookup report in scenario world"))
    }
}

impl Default for LookupWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LookupWorld {
    LookupWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
