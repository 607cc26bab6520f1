//! SyncJob entity model
//!
//! This module contains the SeaORM entity model for the sync_jobs table,
//! which tracks one provider synchronization run per row with live
//! reconciliation counters.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// SyncJob entity representing one synchronization run
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_jobs")]
pub struct Model {
    /// Unique identifier for the sync job (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Provider slug the run pulls from (e.g., acessorias)
    pub provider: String,

    /// Entity kind being synchronized (e.g., companies)
    pub entity: String,

    /// Current status of the job (running, success, failed)
    pub status: String,

    /// Records fetched from the provider so far
    pub total_read: i32,

    /// Companies created by this run
    pub total_created: i32,

    /// Companies updated by this run
    pub total_updated: i32,

    /// Unchanged records skipped by this run
    pub total_skipped: i32,

    /// Per-record failures recorded by this run
    pub total_errors: i32,

    /// Failure description if the job failed
    pub error_message: Option<String>,

    /// Timestamp when the job started
    pub started_at: DateTimeWithTimeZone,

    /// Timestamp when the job reached a terminal status
    pub finished_at: Option<DateTimeWithTimeZone>,

    /// Principal that triggered the run, if any
    pub created_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Tenant",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    #[sea_orm(has_many = "super::sync_log::Entity")]
    SyncLog,
}

impl Related<Tenant> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::sync_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SyncLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
