//! Fire-and-forget submission of click analytics.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_job::{ClickJob, RequestMeta};
use crate::domain::entities::ShortLink;

/// Hands click jobs to the background worker without waiting on it.
///
/// Each redirect produces two independent jobs: one persisting the
/// [`crate::domain::entities::ClickEvent`] and one incrementing the link's
/// click counter. Submission never blocks; when the queue is full or the
/// worker is gone, the job is dropped and counted.
#[derive(Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickJob>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickJob>) -> Self {
        Self { sender }
    }

    /// Submits the analytics write and the counter increment for `link`.
    pub fn record(&self, link: &ShortLink, meta: RequestMeta) {
        self.submit(ClickJob::Record(meta.into_event(link.id.clone())));
        self.submit(ClickJob::IncrementClicks {
            link_id: link.id.clone(),
        });
    }

    fn submit(&self, job: ClickJob) {
        let kind = job.kind();

        match self.sender.try_send(job) {
            Ok(()) => {
                metrics::counter!("click_jobs_enqueued_total", "kind" => kind).increment(1);
            }
            Err(TrySendError::Full(_)) => {
                warn!(kind, "Click queue full, dropping job");
                metrics::counter!("click_jobs_dropped_total", "kind" => kind).increment(1);
            }
            Err(TrySendError::Closed(_)) => {
                warn!(kind, "Click worker stopped, dropping job");
                metrics::counter!("click_jobs_dropped_total", "kind" => kind).increment(1);
            }
        }
    }

    /// True once the worker side of the queue has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently available in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}
