//! Database migrations for the fiscal-sync service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_12_01_000001_create_tenants;
mod m2025_12_01_000002_create_tenant_admins;
mod m2025_12_01_000003_create_companies;
mod m2025_12_01_000004_create_sync_jobs;
mod m2025_12_01_000005_create_sync_logs;
mod m2025_12_01_000006_create_tenant_integrations;
mod m2025_12_01_000007_create_integration_logs;
mod m2025_12_01_000008_create_webhook_events;
mod m2025_12_01_000009_create_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_12_01_000001_create_tenants::Migration),
            Box::new(m2025_12_01_000002_create_tenant_admins::Migration),
            Box::new(m2025_12_01_000003_create_companies::Migration),
            Box::new(m2025_12_01_000004_create_sync_jobs::Migration),
            Box::new(m2025_12_01_000005_create_sync_logs::Migration),
            Box::new(m2025_12_01_000006_create_tenant_integrations::Migration),
            Box::new(m2025_12_01_000007_create_integration_logs::Migration),
            Box::new(m2025_12_01_000008_create_webhook_events::Migration),
            Box::new(m2025_12_01_000009_create_messages::Migration),
        ]
    }
}
