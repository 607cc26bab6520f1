//! Test utilities for database and API testing.
//!
//! Sets up in-memory SQLite databases with migrations applied and
//! provides fixture helpers for tenants, admins and integrations.

use anyhow::Result;
use chrono::Utc;
use fiscal_sync::config::{ApiToken, AppConfig};
use fiscal_sync::secrets::StaticSecretStore;
use fiscal_sync::server::AppState;
use fiscal_sync::sync::runner::Registry;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;
use uuid::Uuid;

/// Bearer token accepted by test configurations.
pub const TEST_TOKEN: &str = "test-token-123";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Inserts a tenant and returns its id.
#[allow(dead_code)]
pub async fn insert_tenant(db: &DatabaseConnection, slug: &str) -> Result<Uuid> {
    use fiscal_sync::models::tenant;

    let id = Uuid::new_v4();
    tenant::ActiveModel {
        id: Set(id),
        slug: Set(slug.to_string()),
        name: Set(format!("{} Tenant", slug)),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;

    Ok(id)
}

/// Grants a principal admin rights on a tenant.
#[allow(dead_code)]
pub async fn insert_admin(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    principal_id: Uuid,
) -> Result<()> {
    use fiscal_sync::models::tenant_admin;

    tenant_admin::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        principal_id: Set(principal_id),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Inserts a tenant integration row.
#[allow(dead_code)]
pub async fn insert_integration(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    provider: &str,
    base_url: Option<&str>,
    is_enabled: bool,
) -> Result<Uuid> {
    use fiscal_sync::models::tenant_integration;

    let id = Uuid::new_v4();
    tenant_integration::ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        provider: Set(provider.to_string()),
        base_url: Set(base_url.map(str::to_string)),
        is_enabled: Set(is_enabled),
        last_status: Set(None),
        last_run: Set(None),
        last_error: Set(None),
        created_at: Set(Utc::now().fixed_offset()),
        updated_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;

    Ok(id)
}

/// Configuration accepted by the test API: one bearer token, no
/// throttle and a fast poll interval.
#[allow(dead_code)]
pub fn test_config(principal_id: Uuid, acessorias_base_url: &str) -> AppConfig {
    AppConfig {
        api_tokens: vec![ApiToken {
            token: TEST_TOKEN.to_string(),
            principal_id,
        }],
        acessorias_base_url: acessorias_base_url.to_string(),
        sync_throttle_ms: 0,
        poll_interval_ms: 25,
        ..Default::default()
    }
}

/// Builds application state around a test database and secret store.
#[allow(dead_code)]
pub fn build_state(
    db: DatabaseConnection,
    config: AppConfig,
    secrets: StaticSecretStore,
) -> AppState {
    AppState {
        config: Arc::new(config),
        db,
        http: reqwest::Client::new(),
        secrets: Arc::new(secrets),
        registry: Arc::new(Registry::with_defaults()),
    }
}
