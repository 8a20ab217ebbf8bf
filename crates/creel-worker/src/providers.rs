//! External providers consulted before a job is queued.

use async_trait::async_trait;
use thiserror::Error;

use creel_models::{AudioRef, BackgroundClip, Theme, TranscriptSpan};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable(_) | ProviderError::RateLimited(_)
        )
    }
}

/// Speech-to-text with word or phrase timings.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, audio: &AudioRef) -> Result<Vec<TranscriptSpan>, ProviderError>;
}

/// Stock footage search.
#[async_trait]
pub trait ClipProvider: Send + Sync {
    async fn search(&self, keywords: &[String], theme: Theme) -> Result<Vec<BackgroundClip>, ProviderError>;
}
