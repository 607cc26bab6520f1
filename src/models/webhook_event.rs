//! WebhookEvent entity model
//!
//! Raw inbound provider events. Rows are persisted before any parsing so
//! malformed deliveries are still auditable.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// WebhookEvent entity representing one received delivery
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "webhook_events")]
pub struct Model {
    /// Unique identifier for the event (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Declared source system (e.g., contmax)
    pub source: String,

    /// Parsed event object (e.g., messages), if the payload parsed
    pub event_object: Option<String>,

    /// Parsed event action (e.g., create), if the payload parsed
    pub event_action: Option<String>,

    /// Provider message identifier extracted from the payload
    pub message_id: Option<String>,

    /// Provider ticket identifier extracted from the payload
    pub ticket_id: Option<i64>,

    /// Raw delivery payload (redacted)
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: JsonValue,

    /// Whether downstream processing completed successfully
    pub processed: bool,

    /// Processing failure description, if any
    pub error_message: Option<String>,

    /// Timestamp when the event was received
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
