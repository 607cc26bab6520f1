//! Fixed-interval polling of sync job status.
//!
//! Trigger responses return immediately with a running job; callers that
//! want terminal counters poll the job row until it leaves the running
//! state. Counters are reported on every tick, including for failed runs.

use std::time::Duration;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::sync_job;
use crate::repositories::SyncJobRepository;

/// Polls a sync job at a fixed interval until it reaches a terminal state.
pub struct JobPoller {
    db: DatabaseConnection,
    interval: Duration,
}

impl JobPoller {
    /// Creates a poller with the given fixed interval
    pub fn new(db: DatabaseConnection, interval: Duration) -> Self {
        Self { db, interval }
    }

    /// Polls until the job leaves the running state.
    ///
    /// `on_progress` is invoked with every observed snapshot, terminal
    /// included, so callers can render counters even for failed runs.
    pub async fn poll_until_complete<F>(
        &self,
        job_id: Uuid,
        mut on_progress: F,
    ) -> Result<sync_job::Model, ApiError>
    where
        F: FnMut(&sync_job::Model),
    {
        let jobs = SyncJobRepository::new(self.db.clone());

        loop {
            let job = jobs.find_by_id(job_id).await?.ok_or_else(|| {
                ApiError::new(
                    axum::http::StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Sync job not found",
                )
            })?;

            on_progress(&job);

            if job.status != "running" {
                return Ok(job);
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
