//! Service layer owning the in-memory service registry.
//!
//! Provides [`ServiceRegistry`], the single owner of the registry's record
//! collection. Every mutation holds the registry's write lock across its
//! backing store write, so a change becomes visible in memory only after it
//! has been persisted.

use crate::registry::{
    domain::{
        BaseAddress, NewServiceRecord, ProbeOutcome, ProbeRequest, RegistryDomainError, ServiceId,
        ServiceName, ServiceRecord,
    },
    ports::{LivenessProbe, ServiceStore, ServiceStoreError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Request payload for registering a new service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddServiceRequest {
    /// Unique service name.
    pub name: String,
    /// Base address of the service.
    pub address: String,
}

impl AddServiceRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Request payload for updating an existing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateServiceRequest {
    /// Identifier of the record to update.
    pub id: ServiceId,
    /// New unique service name.
    pub name: String,
    /// New base address.
    pub address: String,
}

impl UpdateServiceRequest {
    /// Creates an update request.
    #[must_use]
    pub fn new(id: ServiceId, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum RegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
    /// Backing store operation failed.
    #[error(transparent)]
    Store(#[from] ServiceStoreError),
    /// Another record already uses the name.
    #[error("service '{0}' is already registered")]
    DuplicateName(ServiceName),
    /// The candidate endpoint did not prove it is the named service.
    #[error("service '{name}' failed identity validation: {reason}")]
    IdentityCheckFailed {
        /// Claimed service name.
        name: ServiceName,
        /// Probe failure detail.
        reason: String,
    },
    /// No record exists with the given identifier.
    #[error("service {0} not found")]
    NotFound(ServiceId),
}

/// Result type for registry service operations.
pub type RegistryServiceResult<T> = Result<T, RegistryServiceError>;

/// Counters describing one heartbeat sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Probes that completed.
    pub probed: usize,
    /// Probes that found the service alive.
    pub alive: usize,
    /// Probes that found the service dead.
    pub dead: usize,
    /// Outcomes dropped because the record changed during the sweep.
    pub stale: usize,
    /// Outcomes that could not be persisted.
    pub store_failures: usize,
}

/// Owner of the registered service records.
pub struct ServiceRegistry<S, P, C>
where
    S: ServiceStore,
    P: LivenessProbe + 'static,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    probe: Arc<P>,
    clock: Arc<C>,
    records: RwLock<Vec<ServiceRecord>>,
}

impl<S, P, C> ServiceRegistry<S, P, C>
where
    S: ServiceStore,
    P: LivenessProbe + 'static,
    C: Clock + Send + Sync,
{
    /// Creates an empty registry. Call [`Self::load`] to populate it.
    #[must_use]
    pub fn new(store: Arc<S>, probe: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            probe,
            clock,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Loads every persisted record and resolves its liveness.
    ///
    /// Each record is probed without identity validation and the outcome is
    /// written back. Dead services stay registered; probe and write-back
    /// failures are logged. Returns the number of loaded records.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store cannot be read
    /// and [`RegistryServiceError::DuplicateName`] when two stored records
    /// share a name.
    pub async fn load(&self) -> RegistryServiceResult<usize> {
        let mut loaded = self.store.load_all().await?;
        if let Some(name) = first_duplicate_name(&loaded) {
            error!(service = %name, "stored registry holds the same name twice");
            return Err(RegistryServiceError::DuplicateName(name));
        }
        let requests = loaded
            .iter()
            .map(|record| (record.id(), ProbeRequest::reachability(record)))
            .collect();

        for (id, _, outcome) in self.probe_all(requests).await {
            let Some(record) = loaded.iter_mut().find(|record| record.id() == id) else {
                continue;
            };
            log_probe_outcome(record, &outcome);
            let mut probed = record.clone();
            probed.apply_probe(&outcome, &*self.clock);
            match self.store.update(&probed).await {
                Ok(()) => *record = probed,
                Err(err) => error!(
                    service = %record.name(),
                    error = %err,
                    "failed to persist initial liveness"
                ),
            }
        }

        let count = loaded.len();
        *self.records.write().await = loaded;
        info!(count, "service registry loaded");
        Ok(count)
    }

    /// Returns a snapshot of every record, dead ones included.
    pub async fn list(&self) -> Vec<ServiceRecord> {
        self.records.read().await.clone()
    }

    /// Returns a snapshot of the records currently marked alive.
    pub async fn alive(&self) -> Vec<ServiceRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.is_alive())
            .cloned()
            .collect()
    }

    /// Finds a record by identifier.
    pub async fn find_by_id(&self, id: ServiceId) -> Option<ServiceRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Finds a record by unique name.
    pub async fn find_by_name(&self, name: &str) -> Option<ServiceRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.name().as_str() == name.trim())
            .cloned()
    }

    /// Registers a new service after it proves liveness and identity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] for invalid input,
    /// [`RegistryServiceError::DuplicateName`] when the name is taken,
    /// [`RegistryServiceError::IdentityCheckFailed`] when the identity probe
    /// fails, or [`RegistryServiceError::Store`] when persistence fails. The
    /// registry is unchanged on every error.
    pub async fn add(&self, request: AddServiceRequest) -> RegistryServiceResult<ServiceRecord> {
        let name = ServiceName::new(request.name)?;
        let address = BaseAddress::new(request.address)?;
        info!(service = %name, %address, "request to add service");

        ensure_name_free(&self.records.read().await, &name, None)?;
        let outcome = self.verify_identity(&name, &address).await?;

        let mut records = self.records.write().await;
        ensure_name_free(&records, &name, None)?;
        let new_record = NewServiceRecord::probed(name, address, &outcome, &*self.clock);
        let id = self.store.insert(&new_record).await?;
        let record = ServiceRecord::from_new(id, new_record);
        records.push(record.clone());

        info!(service = %record.name(), %id, "added new service");
        Ok(record)
    }

    /// Updates the name and address of an existing service.
    ///
    /// The identity probe runs only when the requested address differs from
    /// the address held when the change is committed; an unchanged address is
    /// trusted and keeps its current liveness. The probe runs without the
    /// lock, so the comparison is repeated once the lock is held again.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] for an unknown id,
    /// [`RegistryServiceError::DuplicateName`] when renaming onto another
    /// record's name, [`RegistryServiceError::IdentityCheckFailed`] when the
    /// new address fails the identity probe, or domain and store errors. The
    /// registry is unchanged on every error.
    pub async fn update(
        &self,
        request: UpdateServiceRequest,
    ) -> RegistryServiceResult<ServiceRecord> {
        let id = request.id;
        let name = ServiceName::new(request.name)?;
        let address = BaseAddress::new(request.address)?;
        info!(%id, service = %name, %address, "request to update service");

        let mut verified: Option<ProbeOutcome> = None;
        loop {
            let mut records = self.records.write().await;
            ensure_name_free(&records, &name, Some(id))?;
            let slot = records
                .iter_mut()
                .find(|record| record.id() == id)
                .ok_or(RegistryServiceError::NotFound(id))?;

            if verified.is_none() && slot.address() != &address {
                drop(records);
                verified = Some(self.verify_identity(&name, &address).await?);
                continue;
            }

            let mut updated = slot.clone();
            updated.reconfigure(name, address);
            if let Some(probed) = &verified {
                updated.apply_probe(probed, &*self.clock);
            }
            self.store.update(&updated).await?;
            *slot = updated.clone();

            info!(%id, service = %updated.name(), address = %updated.address(), "updated service");
            return Ok(updated);
        }
    }

    /// Re-probes every record and stores the resulting liveness.
    ///
    /// Probes run concurrently without identity validation. Outcomes for
    /// records whose address changed or that disappeared while the probe was
    /// in flight are dropped. Probe and store failures are logged; the sweep
    /// always covers every record.
    pub async fn heartbeat_sweep(&self) -> SweepSummary {
        let requests = self
            .records
            .read()
            .await
            .iter()
            .map(|record| (record.id(), ProbeRequest::reachability(record)))
            .collect();
        let outcomes = self.probe_all(requests).await;

        let mut summary = SweepSummary::default();
        let mut records = self.records.write().await;
        for (id, request, outcome) in outcomes {
            summary.probed += 1;
            if outcome.is_alive() {
                summary.alive += 1;
            } else {
                summary.dead += 1;
            }

            let Some(record) = records
                .iter_mut()
                .find(|record| record.id() == id && record.address() == request.address())
            else {
                summary.stale += 1;
                debug!(%id, "record changed during sweep; dropping probe outcome");
                continue;
            };

            log_probe_outcome(record, &outcome);
            let mut probed = record.clone();
            probed.apply_probe(&outcome, &*self.clock);
            match self.store.update(&probed).await {
                Ok(()) => *record = probed,
                Err(err) => {
                    summary.store_failures += 1;
                    error!(service = %record.name(), error = %err, "failed to persist liveness");
                }
            }
        }

        if summary.dead == 0 && summary.store_failures == 0 {
            info!(probed = summary.probed, "all services online");
        } else {
            warn!(
                probed = summary.probed,
                alive = summary.alive,
                dead = summary.dead,
                stale = summary.stale,
                store_failures = summary.store_failures,
                "service check heartbeat found problems"
            );
        }
        summary
    }

    /// Demotes a service to dead after a failed lookup call.
    ///
    /// Returns `true` when the record was demoted, `false` when it is unknown
    /// or already dead.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the demotion cannot be
    /// persisted; the in-memory record is left unchanged.
    pub async fn mark_dead(
        &self,
        id: ServiceId,
        reason: impl Into<String> + Send,
    ) -> RegistryServiceResult<bool> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            return Ok(false);
        };
        if !record.is_alive() {
            return Ok(false);
        }

        let mut demoted = record.clone();
        demoted.mark_dead(reason, &*self.clock);
        self.store.update(&demoted).await?;
        warn!(
            service = %demoted.name(),
            reason = demoted.last_detail().unwrap_or_default(),
            "service marked dead after failed lookup"
        );
        *record = demoted;
        Ok(true)
    }

    async fn verify_identity(
        &self,
        name: &ServiceName,
        address: &BaseAddress,
    ) -> RegistryServiceResult<ProbeOutcome> {
        let outcome = self
            .probe
            .probe(&ProbeRequest::identity(name.clone(), address.clone()))
            .await;
        if outcome.is_alive() {
            return Ok(outcome);
        }

        let reason = outcome
            .detail()
            .unwrap_or("service did not answer the liveness probe")
            .to_owned();
        warn!(service = %name, %address, %reason, "identity validation failed");
        Err(RegistryServiceError::IdentityCheckFailed {
            name: name.clone(),
            reason,
        })
    }

    async fn probe_all(
        &self,
        requests: Vec<(ServiceId, ProbeRequest)>,
    ) -> Vec<(ServiceId, ProbeRequest, ProbeOutcome)> {
        let mut tasks = JoinSet::new();
        for (id, request) in requests {
            let probe = Arc::clone(&self.probe);
            tasks.spawn(async move {
                let outcome = probe.probe(&request).await;
                (id, request, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => error!(error = %err, "liveness probe task failed"),
            }
        }
        outcomes
    }
}

fn ensure_name_free(
    records: &[ServiceRecord],
    name: &ServiceName,
    except: Option<ServiceId>,
) -> RegistryServiceResult<()> {
    let taken = records
        .iter()
        .any(|record| record.name() == name && Some(record.id()) != except);
    if taken {
        return Err(RegistryServiceError::DuplicateName(name.clone()));
    }
    Ok(())
}

fn first_duplicate_name(records: &[ServiceRecord]) -> Option<ServiceName> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(ServiceRecord::name)
        .find(|name| !seen.insert(*name))
        .cloned()
}

fn log_probe_outcome(record: &ServiceRecord, outcome: &ProbeOutcome) {
    if outcome.is_alive() {
        debug!(service = %record.name(), "service is alive");
    } else {
        warn!(
            service = %record.name(),
            detail = outcome.detail().unwrap_or_default(),
            "service is not available"
        );
    }
}
