//! In-memory backing store for service records.

use crate::registry::{
    domain::{BaseAddress, NewServiceRecord, ServiceId, ServiceName, ServiceRecord},
    ports::{ServiceStore, ServiceStoreError, ServiceStoreResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory service store.
///
/// Writes can be made to fail on demand so callers can verify that store
/// errors surface instead of being applied only in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    last_id: u64,
    records: Vec<ServiceRecord>,
    fail_writes: bool,
    fail_loads: bool,
}

impl InMemoryServiceStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an unprobed record directly, bypassing registry validation.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed(&self, name: ServiceName, address: BaseAddress) -> ServiceStoreResult<ServiceId> {
        let mut state = self.write_state()?;
        Ok(state.push(NewServiceRecord::unprobed(name, address)))
    }

    /// Makes subsequent `insert` and `update` calls fail.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn set_fail_writes(&self, fail: bool) -> ServiceStoreResult<()> {
        self.write_state()?.fail_writes = fail;
        Ok(())
    }

    /// Makes subsequent `load_all` calls fail.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn set_fail_loads(&self, fail: bool) -> ServiceStoreResult<()> {
        self.write_state()?.fail_loads = fail;
        Ok(())
    }

    /// Returns the stored copy of a record.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn stored(&self, id: ServiceId) -> ServiceStoreResult<Option<ServiceRecord>> {
        let state = self.read_state()?;
        Ok(state.records.iter().find(|record| record.id() == id).cloned())
    }

    fn read_state(&self) -> ServiceStoreResult<std::sync::RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state
            .read()
            .map_err(|err| ServiceStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> ServiceStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| ServiceStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

impl InMemoryStoreState {
    fn push(&mut self, record: NewServiceRecord) -> ServiceId {
        self.last_id += 1;
        let id = ServiceId::new(self.last_id);
        self.records.push(ServiceRecord::from_new(id, record));
        id
    }

    fn ensure_writable(&self) -> ServiceStoreResult<()> {
        if self.fail_writes {
            return Err(ServiceStoreError::persistence(std::io::Error::other(
                "in-memory store rejected write",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn load_all(&self) -> ServiceStoreResult<Vec<ServiceRecord>> {
        let state = self.read_state()?;
        if state.fail_loads {
            return Err(ServiceStoreError::persistence(std::io::Error::other(
                "in-memory store rejected load",
            )));
        }
        Ok(state.records.clone())
    }

    async fn insert(&self, record: &NewServiceRecord) -> ServiceStoreResult<ServiceId> {
        let mut state = self.write_state()?;
        state.ensure_writable()?;
        Ok(state.push(record.clone()))
    }

    async fn update(&self, record: &ServiceRecord) -> ServiceStoreResult<()> {
        let mut state = self.write_state()?;
        state.ensure_writable()?;
        let stored = state
            .records
            .iter_mut()
            .find(|stored| stored.id() == record.id())
            .ok_or(ServiceStoreError::NotFound(record.id()))?;
        *stored = record.clone();
        Ok(())
    }
}
