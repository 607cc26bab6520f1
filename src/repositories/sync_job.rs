//! # SyncJob Repository
//!
//! This module provides repository operations for the sync_jobs table,
//! covering job lifecycle transitions and per-page counter checkpoints.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::sync_job::{ActiveModel, Column, Entity, Model};
use crate::sync::SyncCounters;

/// Repository for sync job database operations
pub struct SyncJobRepository {
    db: DatabaseConnection,
}

impl SyncJobRepository {
    /// Create a new SyncJobRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new sync job in running state
    pub async fn create_running(
        &self,
        tenant_id: Uuid,
        provider: &str,
        entity: &str,
        created_by: Option<Uuid>,
    ) -> Result<Model, ApiError> {
        let job = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            provider: Set(provider.to_string()),
            entity: Set(entity.to_string()),
            status: Set("running".to_string()),
            total_read: Set(0),
            total_created: Set(0),
            total_updated: Set(0),
            total_skipped: Set(0),
            total_errors: Set(0),
            error_message: Set(None),
            started_at: Set(Utc::now().fixed_offset()),
            finished_at: Set(None),
            created_by: Set(created_by),
        };

        let result = job.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to create sync job: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to create sync job",
            )
        })?;

        tracing::info!(
            tenant_id = %tenant_id,
            provider = %result.provider,
            job_id = %result.id,
            "Sync job created"
        );

        Ok(result)
    }

    /// Persist the current counters without changing job status.
    ///
    /// Called after each processed page so progress survives a crash.
    pub async fn checkpoint(&self, job_id: Uuid, counters: &SyncCounters) -> Result<(), ApiError> {
        let job = self.require(job_id).await?;

        let mut active: ActiveModel = job.into();
        Self::apply_counters(&mut active, counters);
        active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to checkpoint sync job: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to checkpoint sync job",
            )
        })?;

        Ok(())
    }

    /// Mark a job as succeeded with its final counters
    pub async fn mark_succeeded(
        &self,
        job_id: Uuid,
        counters: &SyncCounters,
    ) -> Result<Model, ApiError> {
        self.finish(job_id, "success", counters, None).await
    }

    /// Mark a job as failed with its final counters and failure reason
    pub async fn mark_failed(
        &self,
        job_id: Uuid,
        counters: &SyncCounters,
        error_message: &str,
    ) -> Result<Model, ApiError> {
        self.finish(job_id, "failed", counters, Some(error_message.to_string()))
            .await
    }

    async fn finish(
        &self,
        job_id: Uuid,
        status: &str,
        counters: &SyncCounters,
        error_message: Option<String>,
    ) -> Result<Model, ApiError> {
        let job = self.require(job_id).await?;

        let mut active: ActiveModel = job.into();
        active.status = Set(status.to_string());
        Self::apply_counters(&mut active, counters);
        active.error_message = Set(error_message);
        active.finished_at = Set(Some(Utc::now().fixed_offset()));

        let updated = active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to finish sync job: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to update sync job",
            )
        })?;

        Ok(updated)
    }

    /// Find a sync job by ID without tenant scoping (internal use)
    pub async fn find_by_id(&self, job_id: Uuid) -> Result<Option<Model>, ApiError> {
        let job = Entity::find_by_id(job_id).one(&self.db).await.map_err(|e| {
            tracing::error!("Failed to find sync job: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to find sync job",
            )
        })?;

        Ok(job)
    }

    /// Find a sync job by ID, ensuring it belongs to the specified tenant
    pub async fn find_by_tenant(
        &self,
        tenant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Model>, ApiError> {
        let job = Entity::find_by_id(job_id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find sync job: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to find sync job",
                )
            })?;

        Ok(job)
    }

    /// List the most recent sync jobs for a tenant, newest first
    pub async fn list_recent(&self, tenant_id: Uuid, limit: u64) -> Result<Vec<Model>, ApiError> {
        let jobs = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_desc(Column::StartedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list sync jobs: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to list sync jobs",
                )
            })?;

        Ok(jobs)
    }

    async fn require(&self, job_id: Uuid) -> Result<Model, ApiError> {
        self.find_by_id(job_id).await?.ok_or_else(|| {
            tracing::error!(job_id = %job_id, "Sync job not found");
            ApiError::new(
                axum::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Sync job not found",
            )
        })
    }

    fn apply_counters(active: &mut ActiveModel, counters: &SyncCounters) {
        active.total_read = Set(counters.read as i32);
        active.total_created = Set(counters.created as i32);
        active.total_updated = Set(counters.updated as i32);
        active.total_skipped = Set(counters.skipped as i32);
        active.total_errors = Set(counters.errors as i32);
    }
}
