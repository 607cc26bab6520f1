//! # Message Repository
//!
//! Idempotent message ingestion. Duplicate deliveries hit the unique
//! provider_message_id index and are silently ignored.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::message::{ActiveModel, Column, Entity};
use crate::redact::redact_value;

/// Fields for one normalized message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub tenant_id: Uuid,
    pub provider_message_id: String,
    pub ticket_id: String,
    pub contact_id: Option<String>,
    pub from_me: bool,
    pub body: Option<String>,
    pub provider_created_at: Option<String>,
    pub whatsapp_id: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub payload: JsonValue,
}

/// Repository for message database operations
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    /// Create a new MessageRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a message, ignoring duplicates by provider_message_id.
    ///
    /// Returns `true` when a new row was inserted.
    pub async fn upsert(&self, new: NewMessage) -> Result<bool, ApiError> {
        let message = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(new.tenant_id),
            provider_message_id: Set(new.provider_message_id),
            ticket_id: Set(new.ticket_id),
            contact_id: Set(new.contact_id),
            from_me: Set(new.from_me),
            body: Set(new.body),
            provider_created_at: Set(new.provider_created_at),
            whatsapp_id: Set(new.whatsapp_id),
            agent_id: Set(new.agent_id),
            agent_name: Set(new.agent_name),
            payload: Set(redact_value(new.payload)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = Entity::insert(message)
            .on_conflict(
                OnConflict::column(Column::ProviderMessageId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert message: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to persist message",
                )
            })?;

        Ok(result > 0)
    }
}
