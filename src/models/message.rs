//! Message entity model
//!
//! Normalized messaging records extracted from webhook events. The unique
//! provider_message_id keeps duplicate deliveries idempotent.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Message entity representing one provider message
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier for the message (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Provider-side message identifier (unique)
    pub provider_message_id: String,

    /// Provider ticket the message belongs to
    pub ticket_id: String,

    /// Provider contact identifier, if present
    pub contact_id: Option<String>,

    /// Whether the message was sent by the tenant side
    pub from_me: bool,

    /// Message body text
    pub body: Option<String>,

    /// Provider-side creation timestamp as received
    pub provider_created_at: Option<String>,

    /// WhatsApp identifier, if present
    pub whatsapp_id: Option<String>,

    /// Agent identifier from the ticket, if present
    pub agent_id: Option<String>,

    /// Agent display name from the ticket, if present
    pub agent_name: Option<String>,

    /// Raw message node as extracted from the delivery (redacted)
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: JsonValue,

    /// Timestamp when the row was written
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Tenant",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<Tenant> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
