//! Render job definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::error::{describe_validation, ModelError, ModelResult};
use crate::{BackgroundClip, CanvasSize, StyleConfig, TranscriptSpan};

/// Unique identifier for a render job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a render job.
///
/// `Queued -> Running -> Completed | Failed`, or `Queued -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque reference to the narration/music track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requested output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct OutputSpec {
    /// Destination understood by the compositor
    #[validate(length(min = 1))]
    pub path: String,
    #[validate(range(min = 1))]
    pub width: u32,
    #[validate(range(min = 1))]
    pub height: u32,
    #[validate(range(min = 1, max = 120))]
    pub fps: u32,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "mp4".to_string()
}

impl OutputSpec {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            fps: 30,
            format: default_format(),
        }
    }

    /// Canvas used for caption layout.
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn check(&self) -> ModelResult<()> {
        self.validate()
            .map_err(|e| ModelError::InvalidOutput(describe_validation(&e)))
    }
}

/// Handle to a finished file returned by the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputRef {
    pub uri: String,
    pub duration_seconds: f64,
}

impl OutputRef {
    pub fn new(uri: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            uri: uri.into(),
            duration_seconds,
        }
    }
}

/// A composition request submitted to the rendering queue.
///
/// Inputs are frozen once queued: the queue takes ownership.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderJob {
    pub id: JobId,
    pub track: AudioRef,
    pub transcript: Vec<TranscriptSpan>,
    pub clips: Vec<BackgroundClip>,
    pub style: StyleConfig,
    pub output_spec: OutputSpec,
    pub created_at: DateTime<Utc>,
}

impl RenderJob {
    /// Create a new job with a fresh ID.
    pub fn new(
        track: AudioRef,
        transcript: Vec<TranscriptSpan>,
        clips: Vec<BackgroundClip>,
        style: StyleConfig,
        output_spec: OutputSpec,
    ) -> Self {
        Self {
            id: JobId::new(),
            track,
            transcript,
            clips,
            style,
            output_spec,
            created_at: Utc::now(),
        }
    }

    /// Replace the clip list (used when falling back to default clips).
    pub fn with_clips(mut self, clips: Vec<BackgroundClip>) -> Self {
        self.clips = clips;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_terminal() {
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn test_output_spec_validation() {
        let spec = OutputSpec::new("out/final.mp4", 1080, 1920);
        assert!(spec.check().is_ok());
        assert_eq!(spec.canvas(), CanvasSize::new(1080.0, 1920.0));

        let mut bad = spec.clone();
        bad.fps = 0;
        assert!(matches!(bad.check(), Err(ModelError::InvalidOutput(_))));
    }

    #[test]
    fn test_render_job_serde_roundtrip() {
        let job = RenderJob::new(
            AudioRef::new("audio://track.mp3"),
            vec![TranscriptSpan::new("hello", 0.0, 1.0)],
            vec![BackgroundClip::new("c1", "stock://c1.mp4", 8.0)],
            StyleConfig::default(),
            OutputSpec::new("out.mp4", 720, 1280),
        );

        let json = serde_json::to_string(&job).expect("serialize RenderJob");
        let decoded: RenderJob = serde_json::from_str(&json).expect("deserialize RenderJob");
        assert_eq!(decoded.id, job.id);
        assert_eq!(decoded.track, job.track);
        assert_eq!(decoded.transcript, job.transcript);
        assert_eq!(decoded.created_at, job.created_at);
    }
}
