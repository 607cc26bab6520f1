//! Migration to create the tenant_admins table.
//!
//! Backs the tenant-admin capability check used by the sync orchestrator:
//! a principal may trigger a sync only for tenants it administers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantAdmins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantAdmins::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TenantAdmins::TenantId).uuid().not_null())
                    .col(ColumnDef::new(TenantAdmins::PrincipalId).uuid().not_null())
                    .col(
                        ColumnDef::new(TenantAdmins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_admins_tenant_id")
                            .from(TenantAdmins::Table, TenantAdmins::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_admins_tenant_principal")
                    .table(TenantAdmins::Table)
                    .col(TenantAdmins::TenantId)
                    .col(TenantAdmins::PrincipalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tenant_admins_tenant_principal")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TenantAdmins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TenantAdmins {
    Table,
    Id,
    TenantId,
    PrincipalId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
