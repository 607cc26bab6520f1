//! Migration to create the tenant_integrations table.
//!
//! Per-tenant enablement and endpoint overrides for external providers,
//! plus the last-run status fields the integration runner maintains.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantIntegrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantIntegrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TenantIntegrations::TenantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantIntegrations::Provider)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TenantIntegrations::BaseUrl).text().null())
                    .col(
                        ColumnDef::new(TenantIntegrations::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(TenantIntegrations::LastStatus).text().null())
                    .col(
                        ColumnDef::new(TenantIntegrations::LastRun)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TenantIntegrations::LastError).text().null())
                    .col(
                        ColumnDef::new(TenantIntegrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TenantIntegrations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_integrations_tenant_id")
                            .from(TenantIntegrations::Table, TenantIntegrations::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_integrations_tenant_provider")
                    .table(TenantIntegrations::Table)
                    .col(TenantIntegrations::TenantId)
                    .col(TenantIntegrations::Provider)
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
                    .name("idx_tenant_integrations_tenant_provider")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TenantIntegrations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TenantIntegrations {
    Table,
    Id,
    TenantId,
    Provider,
    BaseUrl,
    IsEnabled,
    LastStatus,
    LastRun,
    LastError,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
