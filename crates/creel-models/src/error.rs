//! Model validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Coarse classification shared by every error in the workspace.
///
/// Callers use it to decide whether a failure is worth retrying with
/// different inputs, should be surfaced verbatim, or is their own mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller mistake (bad style, malformed spans). Not retried.
    Input,
    /// A required resource is missing (no clips, no transcript).
    ResourceUnavailable,
    /// A collaborator (compositor, provider) failed.
    External,
    /// The job was cancelled or the queue went away.
    Cancelled,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::ResourceUnavailable => "resource_unavailable",
            ErrorCategory::External => "external",
            ErrorCategory::Cancelled => "cancelled",
        }
    }
}

/// Errors raised while validating model inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid span at index {index}: {reason}")]
    InvalidSpan { index: usize, reason: String },

    #[error("Spans out of order: span {index} starts at {start} before previous start {previous}")]
    UnorderedSpans {
        index: usize,
        start: f64,
        previous: f64,
    },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Invalid clip '{id}': {reason}")]
    InvalidClip { id: String, reason: String },

    #[error("Invalid output spec: {0}")]
    InvalidOutput(String),

    #[error("Track of {duration}s needs {segments} segments, limit is {limit}")]
    TrackTooLong {
        duration: f64,
        segments: f64,
        limit: usize,
    },
}

impl ModelError {
    pub fn invalid_span(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSpan {
            index,
            reason: reason.into(),
        }
    }

    pub fn invalid_style(msg: impl Into<String>) -> Self {
        Self::InvalidStyle(msg.into())
    }

    pub fn invalid_clip(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidClip {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Validation failures are always caller mistakes.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Flatten `validator` failures into a single readable message.
pub(crate) fn describe_validation(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
            format!("{} ({})", field, codes.join(", "))
        })
        .collect();
    fields.sort();
    fields.join("; ")
}
