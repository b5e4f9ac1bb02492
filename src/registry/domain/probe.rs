//! Liveness probe request and outcome values.

use super::{BaseAddress, ServiceName, ServiceRecord};

/// How strictly a probe validates the endpoint it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMode {
    /// Any successful response counts as alive.
    Reachability,
    /// The response body must also carry the service's identity marker.
    Identity,
}

/// A single liveness check against a service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    name: ServiceName,
    address: BaseAddress,
    mode: ProbeMode,
}

impl ProbeRequest {
    /// Creates a probe request.
    #[must_use]
    pub const fn new(name: ServiceName, address: BaseAddress, mode: ProbeMode) -> Self {
        Self {
            name,
            address,
            mode,
        }
    }

    /// Creates a reachability probe for an existing record.
    #[must_use]
    pub fn reachability(record: &ServiceRecord) -> Self {
        Self::new(
            record.name().clone(),
            record.address().clone(),
            ProbeMode::Reachability,
        )
    }

    /// Creates an identity-validating probe for a candidate registration.
    #[must_use]
    pub const fn identity(name: ServiceName, address: BaseAddress) -> Self {
        Self::new(name, address, ProbeMode::Identity)
    }

    /// Returns the claimed service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the address being probed.
    #[must_use]
    pub const fn address(&self) -> &BaseAddress {
        &self.address
    }

    /// Returns the validation mode.
    #[must_use]
    pub const fn mode(&self) -> ProbeMode {
        self.mode
    }
}

/// Result of a liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    alive: bool,
    detail: Option<String>,
}

impl ProbeOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub const fn alive() -> Self {
        Self {
            alive: true,
            detail: None,
        }
    }

    /// Creates a failed outcome with an explanation.
    #[must_use]
    pub fn dead(detail: impl Into<String>) -> Self {
        let normalized = detail.into().trim().to_owned();
        Self {
            alive: false,
            detail: (!normalized.is_empty()).then_some(normalized),
        }
    }

    /// Returns whether the endpoint passed the probe.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns the failure detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
