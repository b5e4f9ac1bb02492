//! Error types for service registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name contains a comma or a control character.
    #[error("service name '{0}' contains invalid characters (commas and control characters are not allowed)")]
    InvalidServiceName(String),

    /// The service name exceeds the 100-character limit.
    #[error("service name exceeds 100 character limit: {0}")]
    ServiceNameTooLong(String),

    /// The base address is empty after trimming.
    #[error("service base address must not be empty")]
    EmptyBaseAddress,

    /// The base address does not have an `http://` or `https://` prefix.
    #[error("service base address '{0}' must start with 'http://' or 'https://'")]
    InvalidBaseAddress(String),
}

/// Error returned while parsing liveness from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service liveness: {0}")]
pub struct ParseLivenessError(pub String);
