//! Service record aggregate root.

use super::{BaseAddress, Liveness, ProbeOutcome, ServiceId, ServiceName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A service that has not been assigned a store identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceRecord {
    name: ServiceName,
    address: BaseAddress,
    liveness: Liveness,
    last_checked: Option<DateTime<Utc>>,
    last_detail: Option<String>,
}

impl NewServiceRecord {
    /// Creates a record that has never been probed.
    #[must_use]
    pub const fn unprobed(name: ServiceName, address: BaseAddress) -> Self {
        Self {
            name,
            address,
            liveness: Liveness::Unknown,
            last_checked: None,
            last_detail: None,
        }
    }

    /// Creates a record whose liveness is resolved by `outcome`.
    #[must_use]
    pub fn probed(
        name: ServiceName,
        address: BaseAddress,
        outcome: &ProbeOutcome,
        clock: &impl Clock,
    ) -> Self {
        let mut record = Self::unprobed(name, address);
        record.liveness = if outcome.is_alive() {
            Liveness::Alive
        } else {
            Liveness::Dead
        };
        record.last_checked = Some(clock.utc());
        record.last_detail = outcome.detail().map(str::to_owned);
        record
    }

    /// Returns the service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the base address.
    #[must_use]
    pub const fn address(&self) -> &BaseAddress {
        &self.address
    }

    /// Returns the initial liveness.
    #[must_use]
    pub const fn liveness(&self) -> Liveness {
        self.liveness
    }

    /// Returns when the service was last probed.
    #[must_use]
    pub const fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// Returns the detail of the last failed check.
    #[must_use]
    pub fn last_detail(&self) -> Option<&str> {
        self.last_detail.as_deref()
    }
}

/// Parameter object for reconstructing persisted service state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedServiceData {
    /// Persisted service identifier.
    pub id: ServiceId,
    /// Persisted service name.
    pub name: ServiceName,
    /// Persisted base address.
    pub address: BaseAddress,
    /// Persisted liveness.
    pub liveness: Liveness,
    /// Persisted timestamp of the last check.
    pub last_checked: Option<DateTime<Utc>>,
    /// Persisted detail of the last failed check.
    pub last_detail: Option<String>,
}

/// Registered downstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    id: ServiceId,
    name: ServiceName,
    address: BaseAddress,
    liveness: Liveness,
    last_checked: Option<DateTime<Utc>>,
    last_detail: Option<String>,
}

impl ServiceRecord {
    /// Attaches a store-assigned identifier to a new record.
    #[must_use]
    pub fn from_new(id: ServiceId, record: NewServiceRecord) -> Self {
        Self {
            id,
            name: record.name,
            address: record.address,
            liveness: record.liveness,
            last_checked: record.last_checked,
            last_detail: record.last_detail,
        }
    }

    /// Reconstructs a record from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedServiceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            address: data.address,
            liveness: data.liveness,
            last_checked: data.last_checked,
            last_detail: data.last_detail,
        }
    }

    /// Returns the service identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceId {
        self.id
    }

    /// Returns the unique service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the base address.
    #[must_use]
    pub const fn address(&self) -> &BaseAddress {
        &self.address
    }

    /// Returns the current liveness.
    #[must_use]
    pub const fn liveness(&self) -> Liveness {
        self.liveness
    }

    /// Returns whether lookups may be dispatched to this service.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Returns when the service was last checked.
    #[must_use]
    pub const fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// Returns the detail of the last failed check.
    #[must_use]
    pub fn last_detail(&self) -> Option<&str> {
        self.last_detail.as_deref()
    }

    /// Resolves liveness from a probe outcome.
    ///
    /// This is the only way a record becomes [`Liveness::Alive`].
    pub fn apply_probe(&mut self, outcome: &ProbeOutcome, clock: &impl Clock) {
        self.liveness = if outcome.is_alive() {
            Liveness::Alive
        } else {
            Liveness::Dead
        };
        self.last_detail = outcome.detail().map(str::to_owned);
        self.last_checked = Some(clock.utc());
    }

    /// Demotes the service after a failed lookup call.
    pub fn mark_dead(&mut self, reason: impl Into<String>, clock: &impl Clock) {
        self.liveness = Liveness::Dead;
        let normalized = reason.into().trim().to_owned();
        self.last_detail = (!normalized.is_empty()).then_some(normalized);
        self.last_checked = Some(clock.utc());
    }

    /// Replaces the name and address.
    ///
    /// Liveness is left untouched; callers re-probe when the address changes.
    pub fn reconfigure(&mut self, name: ServiceName, address: BaseAddress) {
        self.name = name;
        self.address = address;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn build_record() -> ServiceRecord {
        let name = ServiceName::new("Virgo").expect("valid service name");
        let address = BaseAddress::new("http://virgo.example.edu").expect("valid address");
        ServiceRecord::from_new(ServiceId::new(1), NewServiceRecord::unprobed(name, address))
    }

    #[test]
    fn new_record_starts_unknown() {
        let record = build_record();

        assert_eq!(record.liveness(), Liveness::Unknown);
        assert!(!record.is_alive());
        assert!(record.last_checked().is_none());
    }

    #[rstest]
    #[case(ProbeOutcome::alive(), Liveness::Alive)]
    #[case(ProbeOutcome::dead("connection refused"), Liveness::Dead)]
    fn probe_resolves_unknown(#[case] outcome: ProbeOutcome, #[case] expected: Liveness) {
        let mut record = build_record();
        record.apply_probe(&outcome, &DefaultClock);

        assert_eq!(record.liveness(), expected);
        assert!(record.last_checked().is_some());
        assert_eq!(record.last_detail(), outcome.detail());
    }

    #[test]
    fn mark_dead_demotes_alive_record() {
        let mut record = build_record();
        record.apply_probe(&ProbeOutcome::alive(), &DefaultClock);

        record.mark_dead("request timed out", &DefaultClock);

        assert_eq!(record.liveness(), Liveness::Dead);
        assert_eq!(record.last_detail(), Some("request timed out"));
    }

    #[test]
    fn successful_probe_revives_dead_record() {
        let mut record = build_record();
        record.mark_dead("system is offline", &DefaultClock);

        record.apply_probe(&ProbeOutcome::alive(), &DefaultClock);

        assert!(record.is_alive());
        assert!(record.last_detail().is_none());
    }

    #[test]
    fn reconfigure_keeps_liveness() {
        let mut record = build_record();
        record.apply_probe(&ProbeOutcome::alive(), &DefaultClock);

        record.reconfigure(
            ServiceName::new("Virgo4").expect("valid service name"),
            BaseAddress::new("http://virgo4.example.edu").expect("valid address"),
        );

        assert_eq!(record.name().as_str(), "Virgo4");
        assert_eq!(record.address().as_str(), "http://virgo4.example.edu");
        assert!(record.is_alive());
    }
}
