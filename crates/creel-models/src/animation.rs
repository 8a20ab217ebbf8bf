//! Keyframes and on-screen text placement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scale and translation applied to a text run.
///
/// Translation is expressed in canvas fractions (1.0 = one full canvas
/// width/height) so keyframes stay independent of output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn translated(translate_x: f64, translate_y: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Snapshot of visual properties at an absolute track time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnimationKeyframe {
    /// Seconds from the start of the track
    pub time_offset: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_override: Option<String>,
}

impl AnimationKeyframe {
    /// Keyframe with identity transform; opacity is clamped to `[0, 1]`.
    pub fn new(time_offset: f64, opacity: f64) -> Self {
        Self {
            time_offset,
            opacity: opacity.clamp(0.0, 1.0),
            transform: Transform::IDENTITY,
            color_override: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_override = Some(color.into());
        self
    }
}

/// Keyframe sequence for one transcript span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpanAnimation {
    /// Index into the transcript the schedule was computed from
    pub span_index: usize,
    pub keyframes: Vec<AnimationKeyframe>,
}

impl SpanAnimation {
    /// First and last keyframe times, if any.
    pub fn window(&self) -> Option<(f64, f64)> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        Some((first.time_offset, last.time_offset))
    }
}

/// Output canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    /// Vertical 9:16 HD.
    fn default() -> Self {
        Self::new(1080.0, 1920.0)
    }
}

/// Where a span is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpanPlacement {
    pub span_index: usize,
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Wrap width for the compositor, in pixels
    pub max_width: f64,
    /// Display line the span was packed into
    pub line: usize,
}

/// Spans grouped onto one display line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayLine {
    pub span_indices: Vec<usize>,
    /// Estimated pixel width from character count
    pub estimated_width: f64,
    pub start: f64,
    pub end: f64,
}

/// Result of caption layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextLayout {
    pub placements: Vec<SpanPlacement>,
    pub lines: Vec<DisplayLine>,
}
