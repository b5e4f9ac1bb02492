//! Request bodies and response views.

use crate::registry::{
    domain::{ServiceId, ServiceRecord},
    services::{AddServiceRequest, UpdateServiceRequest},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/services`.
///
/// The address is accepted as either `address` or `url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddServiceBody {
    /// Unique service name.
    pub name: String,
    /// Base address of the service.
    #[serde(alias = "url")]
    pub address: String,
}

impl From<AddServiceBody> for AddServiceRequest {
    fn from(body: AddServiceBody) -> Self {
        Self::new(body.name, body.address)
    }
}

/// Body of `PUT /api/services`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateServiceBody {
    /// Identifier of the service to update.
    pub id: u64,
    /// New unique service name.
    pub name: String,
    /// New base address.
    #[serde(alias = "url")]
    pub address: String,
}

impl From<UpdateServiceBody> for UpdateServiceRequest {
    fn from(body: UpdateServiceBody) -> Self {
        Self::new(ServiceId::new(body.id), body.name, body.address)
    }
}

/// JSON view of a registered service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceView {
    /// Service identifier.
    pub id: u64,
    /// Unique service name.
    pub name: String,
    /// Base address.
    pub address: String,
    /// Whether lookups are dispatched to the service.
    pub alive: bool,
    /// Liveness state name.
    pub status: String,
    /// When liveness was last resolved.
    pub last_checked: Option<DateTime<Utc>>,
}

impl From<&ServiceRecord> for ServiceView {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            id: record.id().value(),
            name: record.name().as_str().to_owned(),
            address: record.address().as_str().to_owned(),
            alive: record.is_alive(),
            status: record.liveness().as_str().to_owned(),
            last_checked: record.last_checked(),
        }
    }
}
