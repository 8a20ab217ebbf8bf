//! Time-stamped transcript spans.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// A single transcribed word or phrase with its position on the track.
///
/// Times are seconds from the start of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSpan {
    /// Transcribed text
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds (strictly after `start`)
    pub end: f64,
    /// Recognition confidence in `[0, 1]`, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TranscriptSpan {
    /// Create a span without a confidence score.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            confidence: None,
        }
    }

    /// Set confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Span length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check the span on its own; `index` is only used for the error message.
    pub fn validate(&self, index: usize) -> ModelResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ModelError::invalid_span(index, "non-finite offset"));
        }
        if self.start < 0.0 {
            return Err(ModelError::invalid_span(
                index,
                format!("negative start {}", self.start),
            ));
        }
        if self.end <= self.start {
            return Err(ModelError::invalid_span(
                index,
                format!("end {} is not after start {}", self.end, self.start),
            ));
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ModelError::invalid_span(
                    index,
                    format!("confidence {} outside [0, 1]", confidence),
                ));
            }
        }
        Ok(())
    }
}

/// Validate a whole transcript.
///
/// Spans must be ordered by `start`. Gaps and overlaps are both accepted.
pub fn validate_transcript(spans: &[TranscriptSpan]) -> ModelResult<()> {
    let mut previous: Option<f64> = None;
    for (index, span) in spans.iter().enumerate() {
        span.validate(index)?;
        if let Some(prev) = previous {
            if span.start < prev {
                return Err(ModelError::UnorderedSpans {
                    index,
                    start: span.start,
                    previous: prev,
                });
            }
        }
        previous = Some(span.start);
    }
    Ok(())
}

/// Total track length implied by a transcript: the latest span end, or 0.
pub fn transcript_duration(spans: &[TranscriptSpan]) -> f64 {
    spans.iter().map(|s| s.end).fold(0.0, f64::max)
}
