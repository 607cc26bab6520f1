//! Company entity model
//!
//! This module contains the SeaORM entity model for the companies table,
//! the reconciliation target of the provider sync pipeline. A uniqueness
//! index on (tenant_id, tax_id) backs idempotent upserts.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Company entity representing a fiscal entity managed for a tenant
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Formatted tax identifier (CNPJ or CPF) used for matching
    pub tax_id: String,

    /// Company display name
    pub name: String,

    /// Tax regime classification (e.g., simples_nacional)
    pub tax_regime: String,

    /// Whether the company issues invoices
    pub issues_invoices: bool,

    /// Monthly revenue entries
    #[sea_orm(column_type = "JsonBinary")]
    pub monthly_revenue: JsonValue,

    /// Fiscal obligations
    #[sea_orm(column_type = "JsonBinary")]
    pub obligations: JsonValue,

    /// Company partners
    #[sea_orm(column_type = "JsonBinary")]
    pub partners: JsonValue,

    /// Provider the record was imported from, if any
    pub external_source: Option<String>,

    /// Punctuation-free identifier for provider-side lookup
    pub external_key: Option<String>,

    /// Raw provider record as last received
    #[sea_orm(column_type = "JsonBinary")]
    pub raw_payload: Option<JsonValue>,

    /// Fingerprint of the raw payload for change detection
    pub hash_payload: Option<String>,

    /// Timestamp of the last successful provider sync touch
    pub synced_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the company was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the company was last updated
    pub updated_at: DateTimeWithTimeZone,
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
