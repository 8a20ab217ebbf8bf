//! Composition error types.

use creel_models::{ErrorCategory, ModelError};
use thiserror::Error;

pub type ComposeResult<T> = Result<T, ComposeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    #[error("Invalid input: {0}")]
    Input(#[from] ModelError),

    #[error("No background clips available")]
    NoClipsAvailable,
}

impl ComposeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ComposeError::Input(_) => ErrorCategory::Input,
            ComposeError::NoClipsAvailable => ErrorCategory::ResourceUnavailable,
        }
    }

    pub fn is_no_clips(&self) -> bool {
        matches!(self, ComposeError::NoClipsAvailable)
    }
}
