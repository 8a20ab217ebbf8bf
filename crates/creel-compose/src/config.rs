//! Composition configuration.

/// Default target segment length in seconds.
pub const DEFAULT_TARGET_SEGMENT_SECS: f64 = 10.0;

/// Default upper bound on segments per timeline.
pub const DEFAULT_MAX_SEGMENTS: usize = 10_000;

/// Tunables for timeline construction.
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Preferred segment length; actual lengths are stretched to tile exactly
    pub target_segment_secs: f64,
    /// Tracks needing more segments than this are rejected as input errors
    pub max_segments: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            target_segment_secs: DEFAULT_TARGET_SEGMENT_SECS,
            max_segments: DEFAULT_MAX_SEGMENTS,
        }
    }
}

impl ComposeConfig {
    /// Create config from environment variables.
    ///
    /// Non-positive or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            target_segment_secs: std::env::var("COMPOSE_TARGET_SEGMENT_SECS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_TARGET_SEGMENT_SECS),
            max_segments: std::env::var("COMPOSE_MAX_SEGMENTS")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_MAX_SEGMENTS),
        }
    }

    /// Set the target segment length.
    pub fn with_target_segment_secs(mut self, secs: f64) -> Self {
        self.target_segment_secs = secs;
        self
    }

    /// Set the segment count limit.
    pub fn with_max_segments(mut self, max: usize) -> Self {
        self.max_segments = max;
        self
    }
}
