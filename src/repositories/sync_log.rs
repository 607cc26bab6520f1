//! # SyncLog Repository
//!
//! Append-only diagnostic lines for sync jobs. Writes are best-effort:
//! a failed log insert must never abort the run it describes, so errors
//! are logged and swallowed. Payloads are redacted before insert.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::sync_log::ActiveModel;
use crate::redact::redact_value;

/// Repository for sync log database operations
pub struct SyncLogRepository {
    db: DatabaseConnection,
}

impl SyncLogRepository {
    /// Create a new SyncLogRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append an info-level line to a sync job
    pub async fn info(&self, sync_job_id: Uuid, message: &str, payload: Option<JsonValue>) {
        self.append(sync_job_id, "info", message, payload).await;
    }

    /// Append a warning-level line to a sync job
    pub async fn warn(&self, sync_job_id: Uuid, message: &str, payload: Option<JsonValue>) {
        self.append(sync_job_id, "warning", message, payload).await;
    }

    /// Append an error-level line to a sync job
    pub async fn error(&self, sync_job_id: Uuid, message: &str, payload: Option<JsonValue>) {
        self.append(sync_job_id, "error", message, payload).await;
    }

    async fn append(
        &self,
        sync_job_id: Uuid,
        level: &str,
        message: &str,
        payload: Option<JsonValue>,
    ) {
        let line = ActiveModel {
            id: Set(Uuid::new_v4()),
            sync_job_id: Set(sync_job_id),
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            payload: Set(payload.map(redact_value)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        if let Err(e) = line.insert(&self.db).await {
            tracing::warn!(
                sync_job_id = %sync_job_id,
                "Failed to append sync log line: {}",
                e
            );
        }
    }
}
