//! Shared data models for the CaptionReel composition core.
//!
//! This crate provides Serde-serializable types for:
//! - Transcript spans and style configuration
//! - Background clips and timelines
//! - Animation keyframes and text layout
//! - Render jobs and progress events

pub mod animation;
pub mod clip;
pub mod error;
pub mod job;
pub mod progress;
pub mod style;
pub mod timeline;
pub mod transcript;

// Re-export common types
pub use animation::{
    AnimationKeyframe, CanvasSize, DisplayLine, SpanAnimation, SpanPlacement, TextLayout, Transform,
};
pub use clip::{BackgroundClip, ClipOrigin};
pub use error::{ErrorCategory, ModelError, ModelResult};
pub use job::{AudioRef, JobId, JobState, OutputRef, OutputSpec, RenderJob};
pub use progress::{ProgressEvent, ProgressStage};
pub use style::{AnimationType, StyleConfig, TextPosition, Theme};
pub use timeline::{Timeline, TimelineSegment, TransitionKind};
pub use transcript::{transcript_duration, validate_transcript, TranscriptSpan};
