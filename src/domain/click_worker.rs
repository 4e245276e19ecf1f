//! Background worker that persists click analytics.
//!
//! The redirect path only enqueues [`ClickJob`]s; this worker owns their
//! execution. Jobs run concurrently up to a fixed limit, each retried with
//! jittered exponential backoff. Failures are logged and counted, never
//! reported back to the request that produced them.
//!
//! The worker returns once every sender of the job channel has been dropped
//! and all in-flight jobs have finished, which lets the server drain pending
//! analytics on shutdown.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_job::ClickJob;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;
const BACKOFF_BASE_MILLIS: u64 = 10;

/// Consumes click jobs until the channel closes, then drains in-flight work.
///
/// At most `concurrency` jobs run at once. While all slots are busy the
/// worker stops pulling from the channel, so a slow store makes the queue
/// fill up and new clicks get dropped at the sender instead of piling up
/// as unbounded tasks.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickJob>,
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(job) = rx.recv().await {
        while let Some(finished) = in_flight.try_join_next() {
            log_join_error(finished);
        }

        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let links = links.clone();
        let clicks = clicks.clone();
        in_flight.spawn(async move {
            process_job(job, links.as_ref(), clicks.as_ref()).await;
            drop(permit);
        });
    }

    let pending = in_flight.len();
    if pending > 0 {
        info!(pending, "Click queue closed, draining in-flight jobs");
    }
    while let Some(finished) = in_flight.join_next().await {
        log_join_error(finished);
    }

    info!("Click worker stopped");
}

/// Executes one job with retries, recording the outcome in metrics.
async fn process_job(job: ClickJob, links: &dyn LinkRepository, clicks: &dyn ClickRepository) {
    let kind = job.kind();
    let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MILLIS)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = match &job {
        ClickJob::Record(event) => {
            RetryIf::start(strategy, || clicks.record(event.clone()), is_retryable)
                .await
                .map(|_| ())
        }
        ClickJob::IncrementClicks { link_id } => {
            RetryIf::start(strategy, || links.increment_clicks(link_id), is_retryable).await
        }
    };

    match result {
        Ok(()) => {
            debug!(kind, "Click job completed");
            match job {
                ClickJob::Record(_) => metrics::counter!("clicks_recorded_total").increment(1),
                ClickJob::IncrementClicks { .. } => {
                    metrics::counter!("click_counter_increments_total").increment(1)
                }
            }
        }
        Err(e) => {
            warn!(kind, error = %e, "Click job failed");
            metrics::counter!("click_jobs_failed_total", "kind" => kind).increment(1);
        }
    }
}

/// A link deleted between the redirect and the increment will never appear.
fn is_retryable(e: &AppError) -> bool {
    !matches!(e, AppError::NotFound(_))
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        warn!(error = %e, "Click job task aborted");
    }
}
