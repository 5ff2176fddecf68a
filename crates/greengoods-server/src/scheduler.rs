//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring stock synchronization job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use greengoods_pipeline::{RunType, SyncOptions};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<greengoods_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_stock_sync_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Registers the stock synchronization job, every six hours on the hour
/// (`0 0 */6 * * *`).
///
/// The job body never propagates an error: a failed or skipped run is
/// logged and the next tick proceeds normally.
async fn register_stock_sync_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<greengoods_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 */6 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting scheduled stock sync");
            run_stock_sync(&pool, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Drives one scheduled synchronizer run.
async fn run_stock_sync(pool: &PgPool, config: &greengoods_core::AppConfig) {
    let client = match greengoods_pipeline::client_from_config(config) {
        Ok(client) => client,
        Err(e) => {
            // Without an API key the run is skipped, not failed; nothing
            // has been written at this point.
            tracing::error!(error = %e, "scheduler: stock sync skipped");
            return;
        }
    };

    let options = SyncOptions::from_config(config, RunType::ScheduledUpdate, "system");

    match greengoods_pipeline::sync_stock(pool, &client, &options).await {
        Ok(outcome) => {
            tracing::info!(
                processed = outcome.processed,
                updated = outcome.updated,
                unchanged = outcome.unchanged,
                failed = outcome.failed,
                "scheduler: scheduled stock sync complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: scheduled stock sync failed");
        }
    }
}
