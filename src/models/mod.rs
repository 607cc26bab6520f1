//! # Data Models
//!
//! This module contains all the SeaORM entity models used throughout the
//! Fiscal Sync API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod company;
pub mod integration_log;
pub mod message;
pub mod sync_job;
pub mod sync_log;
pub mod tenant;
pub mod tenant_admin;
pub mod tenant_integration;
pub mod webhook_event;

pub use company::Entity as Company;
pub use integration_log::Entity as IntegrationLog;
pub use message::Entity as Message;
pub use sync_job::Entity as SyncJob;
pub use sync_log::Entity as SyncLog;
pub use tenant::Entity as Tenant;
pub use tenant_admin::Entity as TenantAdmin;
pub use tenant_integration::Entity as TenantIntegration;
pub use webhook_event::Entity as WebhookEvent;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "fiscal-sync".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
