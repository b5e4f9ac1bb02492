//! Inbound ports served by the HTTP layer.

use crate::lookup::{
    domain::AggregateReport,
    ports::{DownstreamClient, ServiceDirectory},
    services::LookupAggregator,
};
use crate::registry::{
    domain::ServiceRecord,
    ports::{LivenessProbe, ServiceStore},
    services::{AddServiceRequest, RegistryServiceResult, ServiceRegistry, UpdateServiceRequest},
};
use async_trait::async_trait;
use mockable::Clock;

/// Registry operations exposed over HTTP.
#[async_trait]
pub trait RegistryControl: Send + Sync {
    /// Returns every registered service.
    async fn services(&self) -> Vec<ServiceRecord>;

    /// Registers a new service.
    ///
    /// # Errors
    ///
    /// Returns the registry's validation, identity or store failure.
    async fn add_service(&self, request: AddServiceRequest) -> RegistryServiceResult<ServiceRecord>;

    /// Updates an existing service.
    ///
    /// # Errors
    ///
    /// Returns the registry's not-found, validation, identity or store
    /// failure.
    async fn update_service(
        &self,
        request: UpdateServiceRequest,
    ) -> RegistryServiceResult<ServiceRecord>;
}

/// Aggregated identifier lookup exposed over HTTP.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Looks `identifier` up across every registered service.
    async fn lookup(&self, identifier: &str) -> AggregateReport;
}

#[async_trait]
impl<S, P, C> RegistryControl for ServiceRegistry<S, P, C>
where
    S: ServiceStore,
    P: LivenessProbe + 'static,
    C: Clock + Send + Sync,
{
    async fn services(&self) -> Vec<ServiceRecord> {
        self.list().await
    }

    async fn add_service(&self, request: AddServiceRequest) -> RegistryServiceResult<ServiceRecord> {
        self.add(request).await
    }

    async fn update_service(
        &self,
        request: UpdateServiceRequest,
    ) -> RegistryServiceResult<ServiceRecord> {
        self.update(request).await
    }
}

#[async_trait]
impl<D, L> ResourceLookup for LookupAggregator<D, L>
where
    D: ServiceDirectory + 'static,
    L: DownstreamClient + 'static,
{
    async fn lookup(&self, identifier: &str) -> AggregateReport {
        self.aggregate(identifier).await
    }
}
