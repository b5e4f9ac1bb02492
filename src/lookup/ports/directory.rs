//! Registry view used by the lookup aggregator.

use crate::registry::domain::{ServiceId, ServiceRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Read access to registered services plus the demotion command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    /// Returns every registered service, dead ones included.
    async fn snapshot(&self) -> Vec<ServiceRecord>;

    /// Marks a service dead after a failed lookup call.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the demotion cannot be persisted.
    async fn report_unreachable(&self, id: ServiceId, reason: &str) -> Result<(), DirectoryError>;
}

/// Failure to record a demotion.
#[derive(Debug, Clone, Error)]
#[error("failed to demote service: {0}")]
pub struct DirectoryError(Arc<dyn std::error::Error + Send + Sync>);

impl DirectoryError {
    /// Wraps the underlying failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
