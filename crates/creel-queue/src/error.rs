//! Queue error types.

use std::time::Duration;

use creel_compose::ComposeError;
use creel_models::{ErrorCategory, JobId, JobState, ProgressStage};
use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

/// Errors returned by [`RenderingQueue::submit`](crate::RenderingQueue::submit).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    #[error("Job rejected: {0}")]
    Rejected(#[from] ComposeError),

    #[error("Duplicate job: {0}")]
    DuplicateJob(JobId),

    #[error("Queue is shut down")]
    Closed,
}

impl QueueError {
    pub fn closed() -> Self {
        Self::Closed
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QueueError::Rejected(e) => e.category(),
            QueueError::DuplicateJob(_) => ErrorCategory::Input,
            QueueError::Closed => ErrorCategory::Cancelled,
        }
    }

    /// True when the job was rejected only because the clip pool was empty.
    pub fn is_no_clips(&self) -> bool {
        matches!(self, QueueError::Rejected(e) if e.is_no_clips())
    }
}

/// Failures reported by a [`Compositor`](crate::Compositor).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositorError {
    #[error("Compositor failed: {0}")]
    Failed(String),

    #[error("Compositor unavailable: {0}")]
    Unavailable(String),

    #[error("External call timed out after {0:?}")]
    Timeout(Duration),
}

impl CompositorError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Why a submitted job did not produce an output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobFailure {
    #[error("Stage {stage} failed: {error}")]
    Stage {
        stage: ProgressStage,
        #[source]
        error: ComposeError,
    },

    #[error("Stage {stage} failed: {error}")]
    External {
        stage: ProgressStage,
        #[source]
        error: CompositorError,
    },

    #[error("Render task aborted: {0}")]
    Aborted(String),

    #[error("Job cancelled before it started")]
    Cancelled,

    #[error("Queue shut down before the job finished")]
    QueueShutdown,
}

impl JobFailure {
    /// Terminal state this failure leaves the job in.
    pub fn state(&self) -> JobState {
        match self {
            JobFailure::Cancelled | JobFailure::QueueShutdown => JobState::Cancelled,
            JobFailure::Stage { .. } | JobFailure::External { .. } | JobFailure::Aborted(_) => {
                JobState::Failed
            }
        }
    }

    pub fn stage(&self) -> Option<ProgressStage> {
        match self {
            JobFailure::Stage { stage, .. } | JobFailure::External { stage, .. } => Some(*stage),
            JobFailure::Aborted(_) | JobFailure::Cancelled | JobFailure::QueueShutdown => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            JobFailure::Stage { error, .. } => error.category(),
            JobFailure::External { .. } | JobFailure::Aborted(_) => ErrorCategory::External,
            JobFailure::Cancelled | JobFailure::QueueShutdown => ErrorCategory::Cancelled,
        }
    }
}
