//! Company synchronization against the Acessorias provider API.
//!
//! Pages through `GET {base}/companies/ListAll?page={n}` with an
//! unconditional throttle before every request, reconciles each record
//! and checkpoints counters after every page. Any page-level fetch
//! failure aborts the run and fails the job; per-record failures are
//! counted and the run continues.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use serde_json::{Value as JsonValue, json};
use tokio::time::sleep;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::sync_job;
use crate::repositories::{CompanyRepository, SyncJobRepository, SyncLogRepository};
use crate::sync::SyncCounters;
use crate::sync::extract::{page_records, total_pages};
use crate::sync::reconcile::{Action, reconcile_company};

/// Provider slug for the Acessorias integration.
pub const PROVIDER_SLUG: &str = "acessorias";

/// Entity kind synchronized by the company pipeline.
pub const ENTITY_COMPANIES: &str = "companies";

/// Everything one company sync run needs.
#[derive(Clone)]
pub struct CompanySyncContext {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub tenant_id: Uuid,
    pub job_id: Uuid,
    pub api_token: String,
    pub base_url: String,
    pub throttle: Duration,
}

/// Runs a company sync to completion, returning the terminal job row.
///
/// The job always reaches a terminal status: page failures mark it
/// failed, everything else marks it succeeded. `Err` is reserved for
/// infrastructure failures updating the job row itself.
pub async fn run_company_sync(ctx: &CompanySyncContext) -> Result<sync_job::Model, ApiError> {
    let companies = CompanyRepository::new(ctx.db.clone());
    let jobs = SyncJobRepository::new(ctx.db.clone());
    let logs = SyncLogRepository::new(ctx.db.clone());

    let mut counters = SyncCounters::default();
    let mut page: u64 = 1;
    let mut page_hint: Option<u64> = None;

    loop {
        // Unconditional throttle, including before the first request.
        sleep(ctx.throttle).await;

        let body = match fetch_page(ctx, page).await {
            Ok(body) => body,
            Err(message) => {
                tracing::error!(
                    job_id = %ctx.job_id,
                    page,
                    "Company sync aborted: {}",
                    message
                );
                metrics::counter!("sync_page_failures_total").increment(1);
                counters.errors += 1;
                logs.error(ctx.job_id, &message, Some(json!({ "page": page })))
                    .await;
                return jobs.mark_failed(ctx.job_id, &counters, &message).await;
            }
        };
        metrics::counter!("sync_pages_fetched_total").increment(1);

        if page_hint.is_none() {
            page_hint = total_pages(&body);
        }

        let records: Vec<JsonValue> = match page_records(&body) {
            Some(records) => records.clone(),
            // Unknown response shape ends pagination like an empty page.
            None => Vec::new(),
        };

        if records.is_empty() {
            break;
        }

        for record in &records {
            counters.read += 1;
            match reconcile_company(&companies, ctx.tenant_id, PROVIDER_SLUG, record).await {
                Ok(Action::Created) => {
                    counters.created += 1;
                    metrics::counter!("sync_companies_created_total").increment(1);
                }
                Ok(Action::Updated) => {
                    counters.updated += 1;
                    metrics::counter!("sync_companies_updated_total").increment(1);
                }
                Ok(Action::Skipped) => counters.skipped += 1,
                Ok(Action::MissingIdentifier) => {
                    counters.skipped += 1;
                    logs.warn(
                        ctx.job_id,
                        "Record without usable tax identifier",
                        Some(json!({ "page": page, "record": record })),
                    )
                    .await;
                }
                Err(err) => {
                    counters.errors += 1;
                    metrics::counter!("sync_record_failures_total").increment(1);
                    logs.error(
                        ctx.job_id,
                        "Failed to reconcile record",
                        Some(json!({
                            "page": page,
                            "record": record,
                            "error": err.message.as_ref(),
                        })),
                    )
                    .await;
                }
            }
        }

        jobs.checkpoint(ctx.job_id, &counters).await?;
        logs.info(
            ctx.job_id,
            &format!("Page {} processed", page),
            Some(counters_payload(&counters)),
        )
        .await;

        if let Some(total) = page_hint
            && page >= total
        {
            break;
        }
        page += 1;
    }

    let job = jobs.mark_succeeded(ctx.job_id, &counters).await?;
    logs.info(
        ctx.job_id,
        "Company sync finished",
        Some(counters_payload(&counters)),
    )
    .await;

    tracing::info!(
        job_id = %ctx.job_id,
        tenant_id = %ctx.tenant_id,
        read = counters.read,
        created = counters.created,
        updated = counters.updated,
        skipped = counters.skipped,
        errors = counters.errors,
        "Company sync finished"
    );

    Ok(job)
}

async fn fetch_page(ctx: &CompanySyncContext, page: u64) -> Result<JsonValue, String> {
    let url = format!(
        "{}/companies/ListAll?page={}",
        ctx.base_url.trim_end_matches('/'),
        page
    );

    let response = ctx
        .http
        .get(&url)
        .bearer_auth(&ctx.api_token)
        .send()
        .await
        .map_err(|e| format!("Provider request for page {} failed: {}", page, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!(
            "Provider returned status {} for page {}",
            status.as_u16(),
            page
        ));
    }

    response
        .json::<JsonValue>()
        .await
        .map_err(|e| format!("Provider returned invalid JSON for page {}: {}", page, e))
}

fn counters_payload(counters: &SyncCounters) -> JsonValue {
    json!({
        "total_read": counters.read,
        "total_created": counters.created,
        "total_updated": counters.updated,
        "total_skipped": counters.skipped,
        "total_errors": counters.errors,
    })
}
