//! # WebhookEvent Repository
//!
//! Raw inbound events are persisted before any parsing or downstream
//! write; the processed flag and error message track the outcome.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::webhook_event::{ActiveModel, Entity, Model};
use crate::redact::redact_value;
use sea_orm::EntityTrait;

/// Repository for webhook event database operations
pub struct WebhookEventRepository {
    db: DatabaseConnection,
}

impl WebhookEventRepository {
    /// Create a new WebhookEventRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a received delivery before any processing
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        source: &str,
        payload: JsonValue,
        event_object: Option<String>,
        event_action: Option<String>,
        message_id: Option<String>,
        ticket_id: Option<i64>,
        error_message: Option<String>,
    ) -> Result<Model, ApiError> {
        let event = ActiveModel {
            id: Set(Uuid::new_v4()),
            source: Set(source.to_string()),
            event_object: Set(event_object),
            event_action: Set(event_action),
            message_id: Set(message_id),
            ticket_id: Set(ticket_id),
            payload: Set(redact_value(payload)),
            processed: Set(false),
            error_message: Set(error_message),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = event.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to persist webhook event: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to persist webhook event",
            )
        })?;

        Ok(inserted)
    }

    /// Mark an event as processed
    pub async fn mark_processed(&self, event_id: Uuid) -> Result<(), ApiError> {
        self.set_outcome(event_id, true, None).await
    }

    /// Record a processing failure on an event
    pub async fn mark_failed(&self, event_id: Uuid, error: &str) -> Result<(), ApiError> {
        self.set_outcome(event_id, false, Some(error.to_string()))
            .await
    }

    async fn set_outcome(
        &self,
        event_id: Uuid,
        processed: bool,
        error: Option<String>,
    ) -> Result<(), ApiError> {
        let event = Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::new(
                    axum::http::StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Webhook event not found",
                )
            })?;

        let mut active: ActiveModel = event.into();
        active.processed = Set(processed);
        active.error_message = Set(error);
        active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to update webhook event: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to update webhook event",
            )
        })?;

        Ok(())
    }
}
