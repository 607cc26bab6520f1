//! # IntegrationLog Repository
//!
//! Insert-only audit rows for integration-runner dispatches. Response
//! payloads are redacted before insert.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::integration_log::{ActiveModel, Model};
use crate::redact::redact_value;

/// Fields for one integration log row.
#[derive(Debug, Clone)]
pub struct NewIntegrationLog {
    pub tenant_id: Uuid,
    pub provider_slug: String,
    pub execution_id: Uuid,
    pub status: String,
    pub execution_time_ms: i64,
    pub total_processed: i32,
    pub total_matched: i32,
    pub total_ignored: i32,
    pub total_review: i32,
    pub error_message: Option<String>,
    pub response: Option<JsonValue>,
}

/// Repository for integration log database operations
pub struct IntegrationLogRepository {
    db: DatabaseConnection,
}

impl IntegrationLogRepository {
    /// Create a new IntegrationLogRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record one dispatch outcome
    pub async fn record(&self, new: NewIntegrationLog) -> Result<Model, ApiError> {
        let row = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(new.tenant_id),
            provider_slug: Set(new.provider_slug),
            execution_id: Set(new.execution_id),
            status: Set(new.status),
            execution_time_ms: Set(new.execution_time_ms),
            total_processed: Set(new.total_processed),
            total_matched: Set(new.total_matched),
            total_ignored: Set(new.total_ignored),
            total_review: Set(new.total_review),
            error_message: Set(new.error_message),
            response: Set(new.response.map(redact_value)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = row.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to record integration log: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to record integration log",
            )
        })?;

        Ok(inserted)
    }
}
