//! Values exchanged with downstream services.

use crate::registry::domain::{BaseAddress, ServiceId, ServiceName, ServiceRecord};
use thiserror::Error;

/// Service a single lookup call is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    id: ServiceId,
    name: ServiceName,
    address: BaseAddress,
}

impl LookupTarget {
    /// Creates a lookup target.
    #[must_use]
    pub const fn new(id: ServiceId, name: ServiceName, address: BaseAddress) -> Self {
        Self { id, name, address }
    }

    /// Returns the registry identifier of the service.
    #[must_use]
    pub const fn id(&self) -> ServiceId {
        self.id
    }

    /// Returns the service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the service base address.
    #[must_use]
    pub const fn address(&self) -> &BaseAddress {
        &self.address
    }
}

impl From<&ServiceRecord> for LookupTarget {
    fn from(record: &ServiceRecord) -> Self {
        Self::new(record.id(), record.name().clone(), record.address().clone())
    }
}

/// Raw answer from a downstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl DownstreamReply {
    /// Creates a reply.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure of a downstream call.
///
/// Any of these demotes the service until the next heartbeat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownstreamError {
    /// No answer within the lookup timeout.
    #[error("request timed out")]
    TimedOut,
    /// The connection was refused.
    #[error("system is offline")]
    Refused,
    /// Any other transport failure.
    #[error("{0}")]
    Transport(String),
}

impl DownstreamError {
    /// Returns the HTTP status reported for this failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::TimedOut => 408,
            Self::Refused => 503,
            Self::Transport(_) => 400,
        }
    }
}
