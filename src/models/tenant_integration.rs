//! TenantIntegration entity model
//!
//! Per-tenant provider enablement, endpoint overrides and last-run status.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// TenantIntegration entity representing provider settings for a tenant
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenant_integrations")]
pub struct Model {
    /// Unique identifier for the integration row (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Provider slug (e.g., acessorias)
    pub provider: String,

    /// Optional per-tenant base URL override
    pub base_url: Option<String>,

    /// Whether the integration may run for this tenant
    pub is_enabled: bool,

    /// Status of the most recent run (running, success, failed)
    pub last_status: Option<String>,

    /// Timestamp of the most recent run
    pub last_run: Option<DateTimeWithTimeZone>,

    /// Failure description from the most recent run, if any
    pub last_error: Option<String>,

    /// Timestamp when the integration was configured
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the integration was last updated
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
