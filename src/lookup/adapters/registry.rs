//! Service registry as the aggregator's service directory.

use crate::lookup::ports::{DirectoryError, ServiceDirectory};
use crate::registry::{
    domain::{ServiceId, ServiceRecord},
    ports::{LivenessProbe, ServiceStore},
    services::ServiceRegistry,
};
use async_trait::async_trait;
use mockable::Clock;

#[async_trait]
impl<S, P, C> ServiceDirectory for ServiceRegistry<S, P, C>
where
    S: ServiceStore,
    P: LivenessProbe + 'static,
    C: Clock + Send + Sync,
{
    async fn snapshot(&self) -> Vec<ServiceRecord> {
        self.list().await
    }

    async fn report_unreachable(&self, id: ServiceId, reason: &str) -> Result<(), DirectoryError> {
        self.mark_dead(id, reason)
            .await
            .map(|_| ())
            .map_err(DirectoryError::new)
    }
}
