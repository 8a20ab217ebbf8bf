//! Worker configuration.

use std::time::Duration;

use creel_compose::keywords::DEFAULT_KEYWORD_LIMIT;

use crate::logging::LogFormat;
use crate::retry::RetryConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Keywords handed to the clip provider
    pub keyword_limit: usize,
    /// Transcription retries after the first attempt
    pub transcribe_retries: u32,
    /// Base backoff between transcription attempts
    pub retry_base_delay: Duration,
    pub log_format: LogFormat,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            transcribe_retries: 2,
            retry_base_delay: Duration::from_millis(200),
            log_format: LogFormat::Pretty,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            keyword_limit: std::env::var("WORKER_KEYWORD_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_KEYWORD_LIMIT),
            transcribe_retries: std::env::var("WORKER_TRANSCRIBE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            retry_base_delay: Duration::from_millis(
                std::env::var("WORKER_RETRY_BASE_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(200),
            ),
            log_format: LogFormat::from_env(),
        }
    }

    /// Load `.env` (if present), then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Retry policy for transcription calls.
    pub fn transcribe_retry(&self) -> RetryConfig {
        RetryConfig::new("transcribe")
            .with_max_retries(self.transcribe_retries)
            .with_base_delay(self.retry_base_delay)
    }
}
