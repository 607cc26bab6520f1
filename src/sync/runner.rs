//! Synchronous integration runner.
//!
//! Dispatches a provider integration for a tenant through a static
//! registry, awaiting completion and recording exactly one audit row per
//! dispatch, successful or not.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, configuration_error, integration_disabled, not_found};
use crate::models::{tenant, tenant_integration};
use crate::repositories::{
    IntegrationLogRepository, NewIntegrationLog, SyncJobRepository, TenantIntegrationRepository,
};
use crate::secrets::{SecretStore, provider_token_name};
use crate::sync::acessorias::{
    CompanySyncContext, ENTITY_COMPANIES, PROVIDER_SLUG, run_company_sync,
};

/// Context handed to a provider integration for one dispatch.
pub struct RunContext<'a> {
    pub db: &'a DatabaseConnection,
    pub http: &'a reqwest::Client,
    pub config: &'a AppConfig,
    pub secrets: &'a dyn SecretStore,
    pub tenant: &'a tenant::Model,
    pub integration: &'a tenant_integration::Model,
    pub triggered_by: Option<Uuid>,
}

/// Terminal summary of one integration dispatch.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub status: String,
    pub error_message: Option<String>,
    pub total_processed: i32,
    pub total_matched: i32,
    pub total_ignored: i32,
    pub total_review: i32,
    pub response: Option<JsonValue>,
}

/// A provider integration the runner can dispatch.
#[async_trait]
pub trait ProviderSync: Send + Sync {
    /// Provider slug this integration answers to
    fn slug(&self) -> &'static str;

    /// Run the integration to completion and summarize the outcome
    async fn run(&self, ctx: RunContext<'_>) -> Result<RunSummary, ApiError>;
}

/// Static registry mapping provider slugs to their implementations.
#[derive(Default)]
pub struct Registry {
    providers: HashMap<&'static str, Arc<dyn ProviderSync>>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with all built-in integrations
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AcessoriasSync));
        registry
    }

    /// Registers an integration under its slug
    pub fn register(&mut self, provider: Arc<dyn ProviderSync>) {
        self.providers.insert(provider.slug(), provider);
    }

    /// Looks up an integration by slug
    pub fn get(&self, slug: &str) -> Option<Arc<dyn ProviderSync>> {
        self.providers.get(slug).cloned()
    }
}

/// Report returned to the caller of a runner dispatch.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: String,
    pub execution_id: Uuid,
    pub execution_time_ms: i64,
}

/// Dispatches the named integration for a tenant and awaits completion.
///
/// Exactly one integration log row is written per dispatch, including
/// for unmapped slugs and integration errors.
#[allow(clippy::too_many_arguments)]
pub async fn dispatch(
    db: &DatabaseConnection,
    http: &reqwest::Client,
    config: &AppConfig,
    secrets: &dyn SecretStore,
    registry: &Registry,
    tenant: &tenant::Model,
    provider_slug: &str,
    triggered_by: Option<Uuid>,
) -> Result<RunReport, ApiError> {
    let integrations = TenantIntegrationRepository::new(db.clone());
    let audit = IntegrationLogRepository::new(db.clone());

    let integration = integrations
        .find(tenant.id, provider_slug)
        .await?
        .ok_or_else(|| not_found("Integration not configured for this tenant"))?;

    if !integration.is_enabled {
        return Err(integration_disabled(provider_slug));
    }

    let execution_id = Uuid::new_v4();
    let started = Instant::now();
    let integration = integrations.mark_running(integration).await?;

    let Some(provider) = registry.get(provider_slug) else {
        let message = format!("No integration implementation for provider '{}'", provider_slug);
        let elapsed = started.elapsed().as_millis() as i64;
        audit
            .record(NewIntegrationLog {
                tenant_id: tenant.id,
                provider_slug: provider_slug.to_string(),
                execution_id,
                status: "error".to_string(),
                execution_time_ms: elapsed,
                total_processed: 0,
                total_matched: 0,
                total_ignored: 0,
                total_review: 0,
                error_message: Some(message.clone()),
                response: None,
            })
            .await?;
        integrations
            .finish(integration, "error", Some(message.clone()))
            .await?;
        return Err(configuration_error(&message));
    };

    let ctx = RunContext {
        db,
        http,
        config,
        secrets,
        tenant,
        integration: &integration,
        triggered_by,
    };

    let outcome = provider.run(ctx).await;
    let elapsed = started.elapsed().as_millis() as i64;

    match outcome {
        Ok(summary) => {
            audit
                .record(NewIntegrationLog {
                    tenant_id: tenant.id,
                    provider_slug: provider_slug.to_string(),
                    execution_id,
                    status: summary.status.clone(),
                    execution_time_ms: elapsed,
                    total_processed: summary.total_processed,
                    total_matched: summary.total_matched,
                    total_ignored: summary.total_ignored,
                    total_review: summary.total_review,
                    error_message: summary.error_message.clone(),
                    response: summary.response.clone(),
                })
                .await?;
            integrations
                .finish(integration, &summary.status, summary.error_message)
                .await?;

            metrics::counter!("integration_dispatches_total").increment(1);

            Ok(RunReport {
                status: summary.status,
                execution_id,
                execution_time_ms: elapsed,
            })
        }
        Err(err) => {
            let message = err.message.to_string();
            audit
                .record(NewIntegrationLog {
                    tenant_id: tenant.id,
                    provider_slug: provider_slug.to_string(),
                    execution_id,
                    status: "failed".to_string(),
                    execution_time_ms: elapsed,
                    total_processed: 0,
                    total_matched: 0,
                    total_ignored: 0,
                    total_review: 0,
                    error_message: Some(message.clone()),
                    response: None,
                })
                .await?;
            integrations
                .finish(integration, "failed", Some(message))
                .await?;
            Err(err)
        }
    }
}

/// Acessorias company sync exposed through the runner.
pub struct AcessoriasSync;

#[async_trait]
impl ProviderSync for AcessoriasSync {
    fn slug(&self) -> &'static str {
        PROVIDER_SLUG
    }

    async fn run(&self, ctx: RunContext<'_>) -> Result<RunSummary, ApiError> {
        let token_name = provider_token_name(&ctx.tenant.slug);
        let api_token = ctx.secrets.get(&token_name).ok_or_else(|| {
            configuration_error(&format!(
                "Provider token {} is not configured",
                token_name
            ))
        })?;

        let base_url = ctx
            .integration
            .base_url
            .clone()
            .unwrap_or_else(|| ctx.config.acessorias_base_url.clone());

        let jobs = SyncJobRepository::new(ctx.db.clone());
        let job = jobs
            .create_running(ctx.tenant.id, PROVIDER_SLUG, ENTITY_COMPANIES, ctx.triggered_by)
            .await?;

        let sync_ctx = CompanySyncContext {
            db: ctx.db.clone(),
            http: ctx.http.clone(),
            tenant_id: ctx.tenant.id,
            job_id: job.id,
            api_token,
            base_url,
            throttle: std::time::Duration::from_millis(ctx.config.sync_throttle_ms),
        };

        let finished = run_company_sync(&sync_ctx).await?;

        Ok(RunSummary {
            status: finished.status.clone(),
            error_message: finished.error_message.clone(),
            total_processed: finished.total_read,
            total_matched: finished.total_updated,
            total_ignored: finished.total_skipped,
            total_review: finished.total_errors,
            response: Some(json!({
                "job_id": finished.id,
                "total_read": finished.total_read,
                "total_created": finished.total_created,
                "total_updated": finished.total_updated,
                "total_skipped": finished.total_skipped,
                "total_errors": finished.total_errors,
            })),
        })
    }
}
