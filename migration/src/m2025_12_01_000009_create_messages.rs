//! Migration to create the messages table.
//!
//! Normalized messaging-provider records extracted from webhook events.
//! The unique index on provider_message_id makes ingestion idempotent:
//! duplicate deliveries insert-and-ignore.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(Messages::ProviderMessageId)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Messages::TicketId).text().not_null())
                    .col(ColumnDef::new(Messages::ContactId).text().null())
                    .col(
                        ColumnDef::new(Messages::FromMe)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Messages::Body).text().null())
                    .col(ColumnDef::new(Messages::ProviderCreatedAt).text().null())
                    .col(ColumnDef::new(Messages::WhatsappId).text().null())
                    .col(ColumnDef::new(Messages::AgentId).text().null())
                    .col(ColumnDef::new(Messages::AgentName).text().null())
                    .col(ColumnDef::new(Messages::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(Messages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_tenant_id")
                            .from(Messages::Table, Messages::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_provider_message_id")
                    .table(Messages::Table)
                    .col(Messages::ProviderMessageId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_tenant_ticket")
                    .table(Messages::Table)
                    .col(Messages::TenantId)
                    .col(Messages::TicketId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_messages_tenant_ticket").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_messages_provider_message_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    TenantId,
    ProviderMessageId,
    TicketId,
    ContactId,
    FromMe,
    Body,
    ProviderCreatedAt,
    WhatsappId,
    AgentId,
    AgentName,
    Payload,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
