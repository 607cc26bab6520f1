//! Sync trigger and job status endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{
    ApiError, configuration_error, forbidden, integration_disabled, not_found, validation_error,
};
use crate::models::sync_job;
use crate::repositories::{SyncJobRepository, TenantIntegrationRepository, TenantRepository};
use crate::secrets::provider_token_name;
use crate::server::AppState;
use crate::sync::acessorias::{
    CompanySyncContext, ENTITY_COMPANIES, PROVIDER_SLUG, run_company_sync,
};

/// Request body for triggering a company sync.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerSyncRequest {
    /// Slug of the tenant to synchronize
    pub tenant_slug: String,
}

/// Immediate acknowledgement of a started sync run.
#[derive(Debug, Serialize, ToSchema)]
pub struct TriggerSyncResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub status: String,
    pub message: String,
}

/// Liveness response for the sync endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub ok: bool,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for the job history listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct JobsQuery {
    /// Maximum number of jobs to return (defaults to the configured limit)
    pub limit: Option<u64>,
}

/// Sync job row as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncJobResponse {
    pub id: Uuid,
    pub provider: String,
    pub entity: String,
    pub status: String,
    pub total_read: i32,
    pub total_created: i32,
    pub total_updated: i32,
    pub total_skipped: i32,
    pub total_errors: i32,
    pub error_message: Option<String>,
    #[schema(value_type = String)]
    pub started_at: DateTimeWithTimeZone,
    #[schema(value_type = Option<String>)]
    pub finished_at: Option<DateTimeWithTimeZone>,
}

impl From<sync_job::Model> for SyncJobResponse {
    fn from(job: sync_job::Model) -> Self {
        Self {
            id: job.id,
            provider: job.provider,
            entity: job.entity,
            status: job.status,
            total_read: job.total_read,
            total_created: job.total_created,
            total_updated: job.total_updated,
            total_skipped: job.total_skipped,
            total_errors: job.total_errors,
            error_message: job.error_message,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

/// Start a company sync for a tenant.
///
/// Returns immediately with the running job; the page walk happens on a
/// detached task. Poll `GET /sync/jobs/{id}` for terminal counters.
#[utoipa::path(
    post,
    path = "/sync/acessorias",
    request_body = TriggerSyncRequest,
    responses(
        (status = 200, description = "Sync started", body = TriggerSyncResponse),
        (status = 400, description = "Integration disabled"),
        (status = 401, description = "Missing or invalid API token"),
        (status = 403, description = "Caller is not a tenant admin"),
        (status = 404, description = "Tenant not found"),
        (status = 500, description = "Provider credential not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "sync"
)]
pub async fn trigger_acessorias_sync(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<TriggerSyncRequest>,
) -> Result<Json<TriggerSyncResponse>, ApiError> {
    let slug = request.tenant_slug.trim();
    if slug.is_empty() {
        return Err(validation_error(
            "tenant_slug must not be empty",
            json!({ "tenant_slug": "required" }),
        ));
    }

    let tenants = TenantRepository::new(state.db.clone());
    let tenant = tenants
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| not_found("Tenant not found"))?;

    if !tenants.is_admin(tenant.id, principal.0).await? {
        return Err(forbidden(Some("Caller is not an admin of this tenant")));
    }

    let token_name = provider_token_name(&tenant.slug);
    let api_token = state.secrets.get(&token_name).ok_or_else(|| {
        configuration_error(&format!("Provider token {} is not configured", token_name))
    })?;

    let integrations = TenantIntegrationRepository::new(state.db.clone());
    let integration = integrations.find(tenant.id, PROVIDER_SLUG).await?;
    if let Some(integration) = &integration
        && !integration.is_enabled
    {
        return Err(integration_disabled(PROVIDER_SLUG));
    }
    // Absent integration rows fall back to the configured provider URL.
    let base_url = integration
        .and_then(|i| i.base_url)
        .unwrap_or_else(|| state.config.acessorias_base_url.clone());

    let jobs = SyncJobRepository::new(state.db.clone());
    let job = jobs
        .create_running(tenant.id, PROVIDER_SLUG, ENTITY_COMPANIES, Some(principal.0))
        .await?;

    tracing::info!(
        tenant_id = %tenant.id,
        job_id = %job.id,
        principal_id = %principal.0,
        "Company sync triggered"
    );

    let ctx = CompanySyncContext {
        db: state.db.clone(),
        http: state.http.clone(),
        tenant_id: tenant.id,
        job_id: job.id,
        api_token,
        base_url,
        throttle: Duration::from_millis(state.config.sync_throttle_ms),
    };
    tokio::spawn(async move {
        if let Err(err) = run_company_sync(&ctx).await {
            tracing::error!(
                job_id = %ctx.job_id,
                "Company sync worker failed: {}",
                err.message
            );
        }
    });

    Ok(Json(TriggerSyncResponse {
        success: true,
        job_id: job.id,
        status: job.status,
        message: "Company sync started".to_string(),
    }))
}

/// Liveness probe for the sync surface.
#[utoipa::path(
    get,
    path = "/sync/acessorias/ping",
    responses((status = 200, description = "Endpoint is reachable", body = PingResponse)),
    tag = "sync"
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        timestamp: Utc::now(),
    })
}

/// Recent sync jobs for the tenant named by the X-Tenant-Id header.
#[utoipa::path(
    get,
    path = "/sync/jobs",
    params(JobsQuery),
    responses(
        (status = 200, description = "Recent jobs, newest first", body = [SyncJobResponse]),
        (status = 400, description = "Missing or malformed X-Tenant-Id header"),
        (status = 401, description = "Missing or invalid API token")
    ),
    security(("bearer_auth" = [])),
    tag = "sync"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    _principal: Principal,
    headers: HeaderMap,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<SyncJobResponse>>, ApiError> {
    let tenant_id = tenant_id_header(&headers)?;
    let limit = query.limit.unwrap_or(state.config.job_history_limit);
    let jobs = SyncJobRepository::new(state.db.clone());
    let rows = jobs.list_recent(tenant_id, limit).await?;
    Ok(Json(rows.into_iter().map(SyncJobResponse::from).collect()))
}

/// One sync job, scoped to the tenant named by the X-Tenant-Id header.
#[utoipa::path(
    get,
    path = "/sync/jobs/{id}",
    params(("id" = Uuid, Path, description = "Sync job ID")),
    responses(
        (status = 200, description = "Job status and counters", body = SyncJobResponse),
        (status = 404, description = "Job not found for this tenant"),
        (status = 401, description = "Missing or invalid API token")
    ),
    security(("bearer_auth" = [])),
    tag = "sync"
)]
pub async fn get_job(
    State(state): State<AppState>,
    _principal: Principal,
    headers: HeaderMap,
    Path(job_id): Path<Uuid>,
) -> Result<Json<SyncJobResponse>, ApiError> {
    let tenant_id = tenant_id_header(&headers)?;
    let jobs = SyncJobRepository::new(state.db.clone());
    let job = jobs
        .find_by_tenant(tenant_id, job_id)
        .await?
        .ok_or_else(|| not_found("Sync job not found"))?;
    Ok(Json(job.into()))
}

fn tenant_id_header(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get("x-tenant-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            validation_error(
                "Missing X-Tenant-Id header",
                json!({ "x-tenant-id": "required" }),
            )
        })?;
    Uuid::parse_str(raw.trim()).map_err(|_| {
        validation_error(
            "X-Tenant-Id must be a UUID",
            json!({ "x-tenant-id": "invalid" }),
        )
    })
}
