//! Migration to create the companies table.
//!
//! Companies are the reconciled local representation of the upstream
//! provider's records. The unique index on (tenant_id, tax_id) hardens the
//! read-then-write window in the diff engine: a racing duplicate create
//! surfaces as a constraint violation instead of a silent duplicate row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Companies::TaxId).text().not_null())
                    .col(ColumnDef::new(Companies::Name).text().not_null())
                    .col(ColumnDef::new(Companies::TaxRegime).text().not_null())
                    .col(
                        ColumnDef::new(Companies::IssuesInvoices)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Companies::MonthlyRevenue)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Companies::Obligations)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Companies::Partners).json_binary().not_null())
                    .col(ColumnDef::new(Companies::ExternalSource).text().null())
                    .col(ColumnDef::new(Companies::ExternalKey).text().null())
                    .col(ColumnDef::new(Companies::RawPayload).json_binary().null())
                    .col(ColumnDef::new(Companies::HashPayload).text().null())
                    .col(
                        ColumnDef::new(Companies::SyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_companies_tenant_id")
                            .from(Companies::Table, Companies::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_tenant_tax_id")
                    .table(Companies::Table)
                    .col(Companies::TenantId)
                    .col(Companies::TaxId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Provenance lookups for audit views
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_tenant_external_key")
                    .table(Companies::Table)
                    .col(Companies::TenantId)
                    .col(Companies::ExternalKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_companies_tenant_external_key")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_companies_tenant_tax_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    TenantId,
    TaxId,
    Name,
    TaxRegime,
    IssuesInvoices,
    MonthlyRevenue,
    Obligations,
    Partners,
    ExternalSource,
    ExternalKey,
    RawPayload,
    HashPayload,
    SyncedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
