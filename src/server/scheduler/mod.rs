//! Background jobs.
//!
//! The only job keeps the stored Dropbox access token from expiring so device photo uploads do
//! not have to wait on a token refresh.

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, service::dropbox::DropboxTokenManager};

pub struct Scheduler {
    tokens: DropboxTokenManager,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Scheduler ready for [`start`](Self::start)
    /// - `Err(Error::SchedulerError)` - Failed to initialize the underlying job scheduler
    pub async fn new(tokens: DropboxTokenManager) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;

        Ok(Self { tokens, sched })
    }

    /// Registers the token refresh job on `refresh_cron` and starts the scheduler.
    ///
    /// # Arguments
    /// - `refresh_cron` - Seconds-first cron expression, e.g. `0 */5 * * * *`
    ///
    /// # Returns
    /// - `Ok(())` - Job registered and scheduler running
    /// - `Err(Error::SchedulerError)` - Invalid cron expression or scheduler failure
    pub async fn start(self, refresh_cron: &str) -> Result<(), Error> {
        let tokens = self.tokens.clone();

        self.sched
            .add(Job::new_async(refresh_cron, move |_, _| {
                let tokens = tokens.clone();

                Box::pin(async move {
                    refresh_dropbox_token(&tokens).await;
                })
            })?)
            .await?;

        self.sched.start().await?;

        tracing::info!(cron = refresh_cron, "Scheduled Dropbox token refresh");

        Ok(())
    }
}

/// Runs one refresh check, logging the outcome instead of failing
pub async fn refresh_dropbox_token(tokens: &DropboxTokenManager) {
    match tokens.refresh_if_expiring().await {
        Ok(true) => tracing::info!("Dropbox token refreshed by scheduled job"),
        Ok(false) => tracing::debug!("Dropbox token still valid"),
        Err(e) => tracing::error!("Scheduled Dropbox token refresh failed: {}", e),
    }
}
