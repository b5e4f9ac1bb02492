//! Scripted liveness probe for registry tests.

use crate::registry::{
    domain::{BaseAddress, ProbeMode, ProbeOutcome, ProbeRequest},
    ports::LivenessProbe,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory liveness probe.
///
/// Endpoints are scripted per address with the body they answer on the
/// liveness route. Unscripted or downed addresses behave like a refused
/// connection. Every probe is counted per address.
#[derive(Debug, Clone, Default)]
pub struct StaticLivenessProbe {
    state: Arc<RwLock<StaticProbeState>>,
}

#[derive(Debug, Default)]
struct StaticProbeState {
    endpoints: HashMap<BaseAddress, String>,
    calls: HashMap<BaseAddress, usize>,
}

impl StaticLivenessProbe {
    /// Creates a probe with no reachable endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `address` answer the liveness route with `body`.
    pub fn serve(&self, address: &BaseAddress, body: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.endpoints.insert(address.clone(), body.into());
        }
    }

    /// Makes `address` answer with the identity marker for `name`.
    pub fn serve_identity(&self, address: &BaseAddress, name: &str) {
        self.serve(address, format!("{name} Aries API"));
    }

    /// Makes `address` refuse connections.
    pub fn take_down(&self, address: &BaseAddress) {
        if let Ok(mut state) = self.state.write() {
            state.endpoints.remove(address);
        }
    }

    /// Returns how many probes have targeted `address`.
    #[must_use]
    pub fn calls(&self, address: &BaseAddress) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(address).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Returns the total number of probes performed.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state
            .read()
            .map(|state| state.calls.values().sum())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LivenessProbe for StaticLivenessProbe {
    async fn probe(&self, request: &ProbeRequest) -> ProbeOutcome {
        let Ok(mut state) = self.state.write() else {
            return ProbeOutcome::dead("probe state unavailable");
        };
        *state.calls.entry(request.address().clone()).or_default() += 1;

        let Some(body) = state.endpoints.get(request.address()) else {
            return ProbeOutcome::dead(format!("{}: connection refused", request.address()));
        };

        if request.mode() == ProbeMode::Identity
            && !body.contains(&request.name().identity_marker())
        {
            return ProbeOutcome::dead(format!("unexpected identity response [{body}]"));
        }

        ProbeOutcome::alive()
    }
}
