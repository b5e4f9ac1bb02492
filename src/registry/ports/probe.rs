//! Liveness probe port.

use crate::registry::domain::{ProbeOutcome, ProbeRequest};
use async_trait::async_trait;

/// Performs one liveness (and optionally identity) check against an endpoint.
///
/// Probing has no side effects of its own; callers decide whether to persist
/// the outcome. Transport failures are reported as a dead outcome rather than
/// an error.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Probes the endpoint described by `request`.
    async fn probe(&self, request: &ProbeRequest) -> ProbeOutcome;
}
