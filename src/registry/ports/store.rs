//! Backing store port for durable service registry state.

use crate::registry::domain::{NewServiceRecord, ServiceId, ServiceRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backing store operations.
pub type ServiceStoreResult<T> = Result<T, ServiceStoreError>;

/// Persistence contract for service records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Returns every persisted record in registration order.
    async fn load_all(&self) -> ServiceStoreResult<Vec<ServiceRecord>>;

    /// Persists a new record and returns its freshly assigned identifier.
    ///
    /// Identifiers increase monotonically and are never reused.
    async fn insert(&self, record: &NewServiceRecord) -> ServiceStoreResult<ServiceId>;

    /// Persists changes to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceStoreError::NotFound`] when the record does not exist.
    async fn update(&self, record: &ServiceRecord) -> ServiceStoreResult<()>;
}

/// Errors returned by backing store implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceStoreError {
    /// The record was not found.
    #[error("service record not found: {0}")]
    NotFound(ServiceId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted service data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceStoreError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
