//! HTTP handlers for the fiscal-sync API.

pub mod integrations;
pub mod sync;
pub mod webhooks;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value as JsonValue, json};

use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;

/// Service name and version.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service identification", body = ServiceInfo)),
    tag = "meta"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Readiness probe backed by a database round trip.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "meta"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<JsonValue>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        tracing::error!("Health check failed: {:#}", err);
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database unreachable",
        )
    })?;

    Ok(Json(json!({ "status": "ok" })))
}
