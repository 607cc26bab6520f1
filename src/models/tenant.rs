//! Tenant entity model
//!
//! This module contains the SeaORM entity model for the tenants table,
//! the root of all tenant-scoped data.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Tenant entity representing an accounting office served by the system
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// URL-safe tenant identifier used in API requests
    pub slug: String,

    /// Display name of the tenant
    pub name: String,

    /// Timestamp when the tenant was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company::Entity")]
    Company,
    #[sea_orm(has_many = "super::tenant_admin::Entity")]
    TenantAdmin,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::tenant_admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantAdmin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
