//! Route table and request handlers.

use super::{
    ApiError, RegistryControl, ResourceLookup,
    views::{AddServiceBody, ServiceView, UpdateServiceBody},
};
use crate::lookup::domain::AggregateReport;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<dyn RegistryControl>,
    lookup: Arc<dyn ResourceLookup>,
}

impl AppState {
    /// Creates handler state from the two inbound ports.
    #[must_use]
    pub fn new(registry: Arc<dyn RegistryControl>, lookup: Arc<dyn ResourceLookup>) -> Self {
        Self { registry, lookup }
    }
}

/// Builds the aggregator's route table.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version))
        .route("/healthcheck", get(healthcheck))
        .route("/favicon.ico", get(favicon))
        .route("/api/resources/{id}", get(lookup_resource))
        .route(
            "/api/services",
            get(list_services).post(add_service).put(update_service),
        )
        .with_state(state)
}

async fn version() -> String {
    format!("Aries version {}", env!("CARGO_PKG_VERSION"))
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    let mut report = Map::new();
    report.insert("alive".to_owned(), Value::from("true"));
    for record in state.registry.services().await {
        report.insert(
            record.name().as_str().to_owned(),
            Value::from(record.is_alive().to_string()),
        );
    }
    Json(Value::Object(report))
}

async fn lookup_resource(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Json<AggregateReport> {
    info!(identifier = %identifier, "resource lookup requested");
    Json(state.lookup.lookup(&identifier).await)
}

async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceView>> {
    let records = state.registry.services().await;
    Json(records.iter().map(ServiceView::from).collect())
}

async fn add_service(
    State(state): State<AppState>,
    body: Result<Json<AddServiceBody>, JsonRejection>,
) -> Result<Json<ServiceView>, ApiError> {
    let Json(request) = body.map_err(|rejection| reject(&rejection))?;
    let record = state.registry.add_service(request.into()).await?;
    Ok(Json(ServiceView::from(&record)))
}

async fn update_service(
    State(state): State<AppState>,
    body: Result<Json<UpdateServiceBody>, JsonRejection>,
) -> Result<Json<ServiceView>, ApiError> {
    let Json(request) = body.map_err(|rejection| reject(&rejection))?;
    let record = state.registry.update_service(request.into()).await?;
    Ok(Json(ServiceView::from(&record)))
}

fn reject(rejection: &JsonRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "invalid service request body");
    ApiError::BadRequest(format!("invalid request: {}", rejection.body_text()))
}
