//! Error responses for the HTTP layer.

use crate::registry::{ports::ServiceStoreError, services::RegistryServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failure returned by an HTTP handler as a plain-text response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),
    /// The request conflicts with an existing service.
    #[error("{0}")]
    Conflict(String),
    /// The requested service does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The server could not complete the request.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryServiceError> for ApiError {
    fn from(err: RegistryServiceError) -> Self {
        match err {
            RegistryServiceError::Domain(_) | RegistryServiceError::IdentityCheckFailed { .. } => {
                Self::BadRequest(err.to_string())
            }
            RegistryServiceError::DuplicateName(_) => Self::Conflict(err.to_string()),
            RegistryServiceError::NotFound(_)
            | RegistryServiceError::Store(ServiceStoreError::NotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            RegistryServiceError::Store(_) => {
                error!(error = %err, "service store failure");
                Self::Internal("service store unavailable".to_owned())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
