//! Background refresh scheduler.
//!
//! Registers the recurring fetch → reconcile → rank job at server startup.
//! The returned [`JobScheduler`] handle must be kept alive for the lifetime
//! of the process; dropping it cancels the refresh loop.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use leafdex_core::{Coordinate, Listing};
use leafdex_engine::{CycleOutcome, RefreshState};
use leafdex_feed::ListingFeed;

/// Everything one refresh cycle needs, shared between the startup cycle and
/// the scheduled ticks.
pub struct RefreshContext {
    pub refresh: Arc<RefreshState>,
    pub feed: ListingFeed,
    pub static_listings: Vec<Listing>,
    pub origin: Coordinate,
}

impl RefreshContext {
    /// Run one cycle and log the outcome. Failures are absorbed; the loop
    /// keeps serving the last published snapshot and retries next tick.
    pub async fn run_and_log(&self) {
        match self
            .refresh
            .run_cycle(&self.feed, &self.static_listings, self.origin)
            .await
        {
            CycleOutcome::Completed {
                cycle,
                merged,
                live,
            } => {
                tracing::info!(cycle, merged, live, "refresh cycle published");
            }
            CycleOutcome::FetchFailed { cycle, retained } => {
                tracing::warn!(
                    cycle,
                    retained,
                    "refresh cycle failed; serving previous data"
                );
            }
            CycleOutcome::Skipped => {
                tracing::debug!("refresh tick skipped; previous cycle still running");
            }
        }
    }
}

/// Builds and starts the background refresh scheduler.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// job cannot be registered (e.g. an invalid cron expression), or the
/// scheduler fails to start.
pub async fn build_scheduler(
    ctx: Arc<RefreshContext>,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);
        Box::pin(async move {
            ctx.run_and_log().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}
