//! On-disk document layout for the flat-file service store.

use crate::registry::{
    domain::{
        BaseAddress, Liveness, NewServiceRecord, PersistedServiceData, ServiceId, ServiceName,
        ServiceRecord,
    },
    ports::{ServiceStoreError, ServiceStoreResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Two persisted rows share one service name.
#[derive(Debug, Error)]
#[error("service name '{0}' is stored more than once")]
pub(super) struct DuplicateStoredName(String);

/// Whole-file document: the id counter plus every record in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct StoreDocument {
    /// Last identifier handed out; never decreases.
    pub(super) last_id: u64,
    pub(super) services: Vec<StoredService>,
}

/// Persisted row for a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredService {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) address: String,
    pub(super) liveness: String,
    #[serde(default)]
    pub(super) last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) last_detail: Option<String>,
}

impl StoreDocument {
    /// Appends a record under the next identifier.
    pub(super) fn push(&mut self, record: &NewServiceRecord) -> ServiceId {
        self.last_id += 1;
        self.services.push(StoredService {
            id: self.last_id,
            name: record.name().as_str().to_owned(),
            address: record.address().as_str().to_owned(),
            liveness: record.liveness().as_str().to_owned(),
            last_checked: record.last_checked(),
            last_detail: record.last_detail().map(str::to_owned),
        });
        ServiceId::new(self.last_id)
    }

    /// Replaces the row matching `record`'s identifier.
    pub(super) fn replace(&mut self, record: &ServiceRecord) -> ServiceStoreResult<()> {
        let row = self
            .services
            .iter_mut()
            .find(|row| row.id == record.id().value())
            .ok_or(ServiceStoreError::NotFound(record.id()))?;
        *row = StoredService::from(record);
        Ok(())
    }

    /// Returns whether a row already uses `name`.
    pub(super) fn contains_name(&self, name: &ServiceName) -> bool {
        self.services.iter().any(|row| row.name == name.as_str())
    }

    /// Reconstructs every row into domain records.
    ///
    /// Rows sharing a name are rejected as invalid persisted data.
    pub(super) fn to_records(&self) -> ServiceStoreResult<Vec<ServiceRecord>> {
        let mut seen = HashSet::new();
        if let Some(row) = self.services.iter().find(|row| !seen.insert(row.name.as_str())) {
            return Err(ServiceStoreError::invalid_persisted_data(
                DuplicateStoredName(row.name.clone()),
            ));
        }
        self.services.iter().map(StoredService::to_record).collect()
    }
}

impl From<&ServiceRecord> for StoredService {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            id: record.id().value(),
            name: record.name().as_str().to_owned(),
            address: record.address().as_str().to_owned(),
            liveness: record.liveness().as_str().to_owned(),
            last_checked: record.last_checked(),
            last_detail: record.last_detail().map(str::to_owned),
        }
    }
}

impl StoredService {
    fn to_record(&self) -> ServiceStoreResult<ServiceRecord> {
        let name =
            ServiceName::new(self.name.clone()).map_err(ServiceStoreError::invalid_persisted_data)?;
        let address = BaseAddress::new(self.address.clone())
            .map_err(ServiceStoreError::invalid_persisted_data)?;
        let liveness = Liveness::try_from(self.liveness.as_str())
            .map_err(ServiceStoreError::invalid_persisted_data)?;

        Ok(ServiceRecord::from_persisted(PersistedServiceData {
            id: ServiceId::new(self.id),
            name,
            address,
            liveness,
            last_checked: self.last_checked,
            last_detail: self.last_detail.clone(),
        }))
    }
}
