//! # Fiscal Sync Main Entry Point

use std::sync::Arc;

use fiscal_sync::{
    config::ConfigLoader,
    db::init_pool,
    secrets::EnvSecretStore,
    server::run_server,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    init_tracing(&config)?;

    tracing::info!("Loaded configuration for profile: {}", config.profile);
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::info!("Configuration: {}", redacted_json);
    }

    let db = init_pool(&config).await?;

    run_server(config, db, Arc::new(EnvSecretStore)).await
}
