//! Queue configuration.

use std::time::Duration;

use creel_compose::ComposeConfig;

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Timeline construction settings
    pub compose: ComposeConfig,
    /// Deadline for each compositor call; `None` waits forever
    pub external_call_timeout: Option<Duration>,
    /// Finished jobs whose state stays queryable through `state_of`
    pub state_history_limit: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            compose: ComposeConfig::default(),
            external_call_timeout: Some(Duration::from_secs(3600)), // 1 hour
            state_history_limit: 1024,
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    ///
    /// `QUEUE_EXTERNAL_TIMEOUT_SECS=0` disables the deadline.
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("QUEUE_EXTERNAL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Self {
            compose: ComposeConfig::from_env(),
            external_call_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            state_history_limit: std::env::var("QUEUE_STATE_HISTORY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// Set the external call deadline.
    pub fn with_external_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.external_call_timeout = timeout;
        self
    }

    /// Set the timeline settings.
    pub fn with_compose(mut self, compose: ComposeConfig) -> Self {
        self.compose = compose;
        self
    }
}
