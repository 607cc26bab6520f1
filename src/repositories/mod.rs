//! # Repositories
//!
//! This module contains repository types encapsulating SeaORM operations
//! with tenant-aware access patterns.

pub mod company;
pub mod integration_log;
pub mod message;
pub mod sync_job;
pub mod sync_log;
pub mod tenant;
pub mod tenant_integration;
pub mod webhook_event;

pub use company::{CompanyRepository, NewCompany};
pub use integration_log::{IntegrationLogRepository, NewIntegrationLog};
pub use message::{MessageRepository, NewMessage};
pub use sync_job::SyncJobRepository;
pub use sync_log::SyncLogRepository;
pub use tenant::TenantRepository;
pub use tenant_integration::TenantIntegrationRepository;
pub use webhook_event::WebhookEventRepository;
