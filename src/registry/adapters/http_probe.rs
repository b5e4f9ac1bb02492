//! HTTP liveness probe adapter.

use crate::registry::{
    domain::{ProbeMode, ProbeOutcome, ProbeRequest},
    ports::LivenessProbe,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Probes services with `GET <address>/<liveness suffix>`.
///
/// Any transport failure or non-success status marks the service dead. In
/// identity mode the response body must also contain the name-derived marker
/// (`"<name> Aries API"`).
#[derive(Debug, Clone)]
pub struct HttpLivenessProbe {
    client: Client,
    liveness_suffix: String,
}

impl HttpLivenessProbe {
    /// Creates a probe whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the client construction error when the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration, liveness_suffix: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            liveness_suffix: liveness_suffix.into(),
        })
    }
}

#[async_trait]
impl LivenessProbe for HttpLivenessProbe {
    async fn probe(&self, request: &ProbeRequest) -> ProbeOutcome {
        let url = request.address().join(&self.liveness_suffix);
        let service = request.name().as_str();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(service, %url, error = %err, "liveness probe failed");
                return ProbeOutcome::dead(format!("request failed: {err}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(service, %url, %status, "liveness probe returned bad status code");
            return ProbeOutcome::dead(format!("bad status code: {}", status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(service, %url, error = %err, "liveness probe returned unreadable response");
                return ProbeOutcome::dead(format!("unreadable response: {err}"));
            }
        };

        if request.mode() == ProbeMode::Identity {
            let marker = request.name().identity_marker();
            if !body.contains(&marker) {
                warn!(service, %url, body = %body, "liveness probe returned unexpected identity");
                return ProbeOutcome::dead(format!("unexpected response [{}]", body.trim()));
            }
        }

        debug!(service, %url, "service is alive");
        ProbeOutcome::alive()
    }
}
