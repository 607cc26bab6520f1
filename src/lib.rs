//! # Fiscal Sync Library
//!
//! Core functionality for the fiscal-sync service: provider company
//! synchronization, webhook ingestion, the integration runner and the
//! HTTP API that fronts them.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod redact;
pub mod repositories;
pub mod secrets;
pub mod server;
pub mod sync;
pub mod telemetry;
pub mod webhooks;
pub use migration;
