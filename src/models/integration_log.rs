//! IntegrationLog entity model
//!
//! Insert-only audit rows, one per integration-runner dispatch.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// IntegrationLog entity representing one runner dispatch
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "integration_logs")]
pub struct Model {
    /// Unique identifier for the log row (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Provider slug that was dispatched
    pub provider_slug: String,

    /// Execution identifier returned to the caller
    pub execution_id: Uuid,

    /// Terminal status of the dispatch (success, failed)
    pub status: String,

    /// Wall-clock duration of the dispatch in milliseconds
    pub execution_time_ms: i64,

    /// Records processed by the dispatched integration
    pub total_processed: i32,

    /// Records matched to existing rows
    pub total_matched: i32,

    /// Records ignored as unchanged
    pub total_ignored: i32,

    /// Records flagged for review
    pub total_review: i32,

    /// Failure description, if the dispatch failed
    pub error_message: Option<String>,

    /// Redacted integration response payload, if any
    #[sea_orm(column_type = "JsonBinary")]
    pub response: Option<JsonValue>,

    /// Timestamp when the row was written
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
