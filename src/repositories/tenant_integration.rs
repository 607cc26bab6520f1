//! # TenantIntegration Repository
//!
//! Provider settings per tenant, including the last-run status fields the
//! integration runner maintains.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::tenant_integration::{ActiveModel, Column, Entity, Model};

/// Repository for tenant integration database operations
pub struct TenantIntegrationRepository {
    db: DatabaseConnection,
}

impl TenantIntegrationRepository {
    /// Create a new TenantIntegrationRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find the integration row for a tenant and provider
    pub async fn find(&self, tenant_id: Uuid, provider: &str) -> Result<Option<Model>, ApiError> {
        let integration = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Provider.eq(provider))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find tenant integration: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to find tenant integration",
                )
            })?;

        Ok(integration)
    }

    /// Mark the integration as running
    pub async fn mark_running(&self, integration: Model) -> Result<Model, ApiError> {
        self.update_status(integration, "running", None).await
    }

    /// Record the terminal status of a run
    pub async fn finish(
        &self,
        integration: Model,
        status: &str,
        error: Option<String>,
    ) -> Result<Model, ApiError> {
        self.update_status(integration, status, error).await
    }

    async fn update_status(
        &self,
        integration: Model,
        status: &str,
        error: Option<String>,
    ) -> Result<Model, ApiError> {
        let now = Utc::now().fixed_offset();

        let mut active: ActiveModel = integration.into();
        active.last_status = Set(Some(status.to_string()));
        active.last_run = Set(Some(now));
        active.last_error = Set(error);
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to update tenant integration: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to update tenant integration",
            )
        })?;

        Ok(updated)
    }
}
