//! Job handles and queue status.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::Serialize;
use tokio::sync::oneshot;

use creel_models::{JobId, OutputRef};

use crate::error::JobFailure;

/// Final result of a submitted job.
pub type JobOutcome = Result<OutputRef, JobFailure>;

/// Resolves exactly once with the job's outcome.
///
/// Dropping the handle does not cancel the job.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    rx: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub(crate) fn new(id: JobId, rx: oneshot::Receiver<JobOutcome>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }
}

impl Future for JobHandle {
    type Output = JobOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped sender means the worker went away without answering.
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(JobFailure::QueueShutdown)))
    }
}

/// Snapshot of the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub running_job_id: Option<JobId>,
    /// Jobs waiting behind the running one
    pub queue_length: usize,
}

impl QueueStatus {
    pub fn is_idle(&self) -> bool {
        self.running_job_id.is_none() && self.queue_length == 0
    }
}
