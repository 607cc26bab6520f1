//! # Provider Synchronization
//!
//! This module contains the provider sync pipeline: paginated fetch,
//! record extraction, fingerprint-based reconciliation, the integration
//! runner and the job poller.

pub mod acessorias;
pub mod extract;
pub mod fingerprint;
pub mod identifier;
pub mod poll;
pub mod reconcile;
pub mod runner;

/// Reconciliation counters for one sync run.
///
/// Checkpointed to the job row after every processed page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounters {
    /// Records fetched from the provider
    pub read: u32,
    /// Companies created
    pub created: u32,
    /// Companies updated
    pub updated: u32,
    /// Unchanged records skipped
    pub skipped: u32,
    /// Per-record failures
    pub errors: u32,
}
