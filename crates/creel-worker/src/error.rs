//! Worker error types.

use thiserror::Error;

use creel_models::ErrorCategory;
use creel_queue::QueueError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Transcription unavailable after {attempts} attempts: {reason}")]
    TranscriptionUnavailable { attempts: u32, reason: String },

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

impl WorkerError {
    pub fn transcription_unavailable(attempts: u32, reason: impl Into<String>) -> Self {
        Self::TranscriptionUnavailable {
            attempts,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            WorkerError::TranscriptionUnavailable { .. } => ErrorCategory::ResourceUnavailable,
            WorkerError::Queue(e) => e.category(),
        }
    }
}
