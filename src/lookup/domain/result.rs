//! Per-service lookup result.

use super::{DownstreamError, DownstreamReply};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const OFFLINE: &str = "system is offline";

/// Outcome of querying one service for one identifier.
///
/// Every registered service yields exactly one result per aggregation,
/// whether it answered, failed or was skipped as offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(rename = "system")]
    service_name: String,
    status: u16,
    #[serde(rename = "response")]
    body: Value,
    #[serde(rename = "response_time_ms")]
    elapsed_ms: u64,
}

impl LookupResult {
    /// Creates a result from its parts.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        status: u16,
        body: Value,
        elapsed: Duration,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            status,
            body,
            elapsed_ms: millis(elapsed),
        }
    }

    /// Result for a service skipped because it is not alive.
    #[must_use]
    pub fn offline(service_name: impl Into<String>) -> Self {
        Self::new(
            service_name,
            503,
            Value::String(OFFLINE.to_owned()),
            Duration::ZERO,
        )
    }

    /// Classifies a downstream answer.
    ///
    /// Success bodies are parsed as JSON when well formed and otherwise kept
    /// as a string. Error bodies are always kept as a string.
    #[must_use]
    pub fn from_reply(
        service_name: impl Into<String>,
        reply: DownstreamReply,
        elapsed: Duration,
    ) -> Self {
        let body = if reply.is_success() {
            serde_json::from_str(&reply.body).unwrap_or_else(|_| Value::String(reply.body))
        } else {
            Value::String(reply.body)
        };
        Self::new(service_name, reply.status, body, elapsed)
    }

    /// Classifies a transport failure.
    #[must_use]
    pub fn from_error(
        service_name: impl Into<String>,
        error: &DownstreamError,
        elapsed: Duration,
    ) -> Self {
        Self::new(
            service_name,
            error.status(),
            Value::String(error.to_string()),
            elapsed,
        )
    }

    /// Result for a call abandoned at the merge deadline.
    #[must_use]
    pub fn timed_out(service_name: impl Into<String>, elapsed: Duration) -> Self {
        Self::from_error(service_name, &DownstreamError::TimedOut, elapsed)
    }

    /// Result for a call task that failed without producing an answer.
    #[must_use]
    pub fn internal_failure(
        service_name: impl Into<String>,
        detail: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self::new(service_name, 500, Value::String(detail.into()), elapsed)
    }

    /// Returns the name of the service that produced this result.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the call duration in milliseconds.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Returns whether the service found the identifier (2xx status).
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

pub(super) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
