//! Synchronous integration runner endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, not_found};
use crate::repositories::TenantRepository;
use crate::server::AppState;
use crate::sync::runner;

/// Request body for a synchronous integration dispatch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RunIntegrationRequest {
    /// Tenant the integration belongs to
    pub tenant_id: Uuid,
    /// Registered provider slug, e.g. `acessorias`
    pub provider_slug: String,
}

/// Outcome of a completed integration dispatch.
#[derive(Debug, Serialize, ToSchema)]
pub struct RunIntegrationResponse {
    pub status: String,
    pub execution_id: Uuid,
    pub execution_time_ms: i64,
}

/// Run an integration to completion and report the outcome.
///
/// Unlike the sync trigger this awaits the provider run; the response
/// carries the audit execution id and wall-clock duration.
#[utoipa::path(
    post,
    path = "/integrations/run",
    request_body = RunIntegrationRequest,
    responses(
        (status = 200, description = "Integration completed", body = RunIntegrationResponse),
        (status = 400, description = "Integration disabled or provider slug unmapped"),
        (status = 401, description = "Missing or invalid API token"),
        (status = 404, description = "Tenant or integration not configured"),
        (status = 500, description = "Provider credential not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "integrations"
)]
pub async fn run_integration(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<RunIntegrationRequest>,
) -> Result<Json<RunIntegrationResponse>, ApiError> {
    let tenants = TenantRepository::new(state.db.clone());
    let tenant = tenants
        .find_by_id(request.tenant_id)
        .await?
        .ok_or_else(|| not_found("Tenant not found"))?;

    let report = runner::dispatch(
        &state.db,
        &state.http,
        &state.config,
        state.secrets.as_ref(),
        &state.registry,
        &tenant,
        request.provider_slug.trim(),
        Some(principal.0),
    )
    .await?;

    Ok(Json(RunIntegrationResponse {
        status: report.status,
        execution_id: report.execution_id,
        execution_time_ms: report.execution_time_ms,
    }))
}
