//! JSON flat-file implementation of the service store.

use super::models::StoreDocument;
use crate::registry::{
    domain::{BaseAddress, NewServiceRecord, ServiceId, ServiceName, ServiceRecord},
    ports::{ServiceStore, ServiceStoreError, ServiceStoreResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Service store persisted as a single JSON document.
///
/// The document is rewritten through a temporary file and renamed into place
/// on every mutation. All file access goes through a capability handle on the
/// store's parent directory and runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct JsonFileServiceStore {
    dir: Arc<Dir>,
    file_name: String,
    file_lock: Arc<Mutex<()>>,
}

impl JsonFileServiceStore {
    /// Opens the store at `path`. A missing file reads as an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceStoreError::Persistence`] when the path has no file
    /// name or its parent directory cannot be opened.
    pub fn open(path: &Utf8Path) -> ServiceStoreResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                ServiceStoreError::persistence(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("store path '{path}' has no file name"),
                ))
            })?
            .to_owned();
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir =
            Dir::open_ambient_dir(parent, ambient_authority()).map_err(ServiceStoreError::persistence)?;

        Ok(Self {
            dir: Arc::new(dir),
            file_name,
            file_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Seeds an empty store from a legacy `name,url` CSV file.
    ///
    /// `csv_name` is resolved inside the store's directory. Nothing is
    /// imported when the JSON document already exists or the CSV file is
    /// absent. Blank lines and lines starting with `#` are skipped; malformed
    /// lines and repeats of an earlier name are logged and skipped. Returns the number of imported records.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceStoreError::Persistence`] when either file cannot be
    /// read or the document cannot be written.
    pub async fn seed_from_legacy_csv(&self, csv_name: &str) -> ServiceStoreResult<usize> {
        let csv_name = csv_name.to_owned();
        self.run_blocking(move |dir, file_name| {
            if read_document(dir, file_name)?.is_some() {
                return Ok(0);
            }
            let contents = match dir.read_to_string(&csv_name) {
                Ok(contents) => contents,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
                Err(err) => return Err(ServiceStoreError::persistence(err)),
            };

            let mut document = StoreDocument::default();
            for (line_number, line) in contents.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match parse_legacy_line(trimmed) {
                    Some(record) if document.contains_name(record.name()) => warn!(
                        file = %csv_name,
                        line = line_number + 1,
                        service = %record.name(),
                        "skipping duplicate legacy service name"
                    ),
                    Some(record) => {
                        document.push(&record);
                    }
                    None => warn!(
                        file = %csv_name,
                        line = line_number + 1,
                        "skipping malformed legacy service line"
                    ),
                }
            }

            let imported = document.services.len();
            write_document(dir, file_name, &document)?;
            info!(file = %csv_name, imported, "seeded service store from legacy CSV");
            Ok(imported)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, operation: F) -> ServiceStoreResult<T>
    where
        F: FnOnce(&Dir, &str) -> ServiceStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let file_lock = Arc::clone(&self.file_lock);
        tokio::task::spawn_blocking(move || {
            let _guard = file_lock
                .lock()
                .map_err(|err| ServiceStoreError::persistence(io::Error::other(err.to_string())))?;
            operation(&dir, &file_name)
        })
        .await
        .map_err(ServiceStoreError::persistence)?
    }
}

#[async_trait]
impl ServiceStore for JsonFileServiceStore {
    async fn load_all(&self) -> ServiceStoreResult<Vec<ServiceRecord>> {
        self.run_blocking(|dir, file_name| {
            read_document(dir, file_name)?
                .unwrap_or_default()
                .to_records()
        })
        .await
    }

    async fn insert(&self, record: &NewServiceRecord) -> ServiceStoreResult<ServiceId> {
        let record = record.clone();
        self.run_blocking(move |dir, file_name| {
            let mut document = read_document(dir, file_name)?.unwrap_or_default();
            let id = document.push(&record);
            write_document(dir, file_name, &document)?;
            Ok(id)
        })
        .await
    }

    async fn update(&self, record: &ServiceRecord) -> ServiceStoreResult<()> {
        let record = record.clone();
        self.run_blocking(move |dir, file_name| {
            let mut document = read_document(dir, file_name)?.unwrap_or_default();
            document.replace(&record)?;
            write_document(dir, file_name, &document)
        })
        .await
    }
}

fn read_document(dir: &Dir, file_name: &str) -> ServiceStoreResult<Option<StoreDocument>> {
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ServiceStoreError::persistence(err)),
    };
    if contents.trim().is_empty() {
        return Ok(Some(StoreDocument::default()));
    }
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(ServiceStoreError::invalid_persisted_data)
}

fn write_document(dir: &Dir, file_name: &str, document: &StoreDocument) -> ServiceStoreResult<()> {
    let serialized =
        serde_json::to_string_pretty(document).map_err(ServiceStoreError::persistence)?;
    let temp_name = format!("{file_name}.tmp");
    dir.write(&temp_name, serialized)
        .map_err(ServiceStoreError::persistence)?;
    dir.rename(&temp_name, dir, file_name)
        .map_err(ServiceStoreError::persistence)
}

fn parse_legacy_line(line: &str) -> Option<NewServiceRecord> {
    let (name, address) = line.split_once(',')?;
    let name = ServiceName::new(name).ok()?;
    let address = BaseAddress::new(address.trim().trim_end_matches(',')).ok()?;
    Some(NewServiceRecord::unprobed(name, address))
}
