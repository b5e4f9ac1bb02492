//! Downstream lookup client port.

use crate::lookup::domain::{DownstreamError, DownstreamReply, LookupTarget};
use async_trait::async_trait;

/// Queries one downstream service for one identifier.
///
/// Any HTTP status counts as an answer. Only transport failures are errors,
/// and each of them causes the caller to demote the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    /// Fetches `identifier` from `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DownstreamError::TimedOut`] when no answer arrives in time,
    /// [`DownstreamError::Refused`] when the connection is refused, or
    /// [`DownstreamError::Transport`] for any other transport failure.
    async fn fetch(
        &self,
        target: &LookupTarget,
        identifier: &str,
    ) -> Result<DownstreamReply, DownstreamError>;
}
