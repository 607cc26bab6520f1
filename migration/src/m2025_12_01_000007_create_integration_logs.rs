//! Migration to create the integration_logs table.
//!
//! One insert-only row per integration-runner dispatch, successful or not.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IntegrationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IntegrationLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IntegrationLogs::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(IntegrationLogs::ProviderSlug)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::ExecutionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IntegrationLogs::Status).text().not_null())
                    .col(
                        ColumnDef::new(IntegrationLogs::ExecutionTimeMs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::TotalProcessed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::TotalMatched)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::TotalIgnored)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::TotalReview)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(IntegrationLogs::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(IntegrationLogs::Response)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IntegrationLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_integration_logs_tenant_created")
                    .table(IntegrationLogs::Table)
                    .col(IntegrationLogs::TenantId)
                    .col(IntegrationLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_integration_logs_tenant_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IntegrationLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IntegrationLogs {
    Table,
    Id,
    TenantId,
    ProviderSlug,
    ExecutionId,
    Status,
    ExecutionTimeMs,
    TotalProcessed,
    TotalMatched,
    TotalIgnored,
    TotalReview,
    ErrorMessage,
    Response,
    CreatedAt,
}
