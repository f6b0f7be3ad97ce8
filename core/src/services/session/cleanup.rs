//! Periodic cleanup of expired sessions
//!
//! An explicit timer-driven loop rather than a framework scheduler: the
//! sweep is an idempotent delete that can also be triggered externally by
//! calling `run_cleanup` from a job runner.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::SessionRepository;

/// Service deleting session rows past their expiry on a schedule
pub struct SessionCleanupService<R: SessionRepository + 'static> {
    repository: Arc<R>,
    /// Sweep interval in seconds
    interval_seconds: u64,
    /// Whether the background loop runs at all
    enabled: bool,
}

impl<R: SessionRepository> SessionCleanupService<R> {
    /// Create a new cleanup service
    pub fn new(repository: Arc<R>, interval_seconds: u64, enabled: bool) -> Self {
        Self {
            repository,
            interval_seconds,
            enabled,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(count)` - Number of expired sessions deleted
    pub async fn run_cleanup(&self) -> DomainResult<u64> {
        let deleted = self.repository.delete_expired(Utc::now()).await?;
        if deleted > 0 {
            info!(
                deleted = deleted,
                event = "session_cleanup",
                "Session cleanup deleted expired rows"
            );
        }
        Ok(deleted)
    }

    /// Start the cleanup loop as a background task
    ///
    /// Spawns a tokio task running `run_cleanup` at the configured
    /// interval. Overlapping sweeps are safe, so a slow delete does not
    /// need coordination with the next tick.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.enabled {
            warn!("Session cleanup is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.interval_seconds,
                "Session cleanup started"
            );

            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup does not
            // race the database coming up
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!(error = %e, "Session cleanup cycle failed");
                }
            }
        });
    }
}
