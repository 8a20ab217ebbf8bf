//! Timeline construction.
//!
//! The track `[0, total]` is cut into `ceil(total / target)` equal segments,
//! clips are assigned cyclically, and each transcript span is placed in the
//! segment containing its start. Identical inputs always produce identical
//! timelines.

use tracing::debug;

use creel_models::{
    transcript_duration, validate_transcript, BackgroundClip, ModelError, StyleConfig, Timeline,
    TimelineSegment, TranscriptSpan,
};

use crate::config::ComposeConfig;
use crate::error::{ComposeError, ComposeResult};
use crate::transitions::transition_for;

/// Builds timelines from a transcript and a clip pool.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    config: ComposeConfig,
}

impl TimelineBuilder {
    pub fn new(config: ComposeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Validate inputs without building anything.
    ///
    /// Input errors win over a missing clip pool.
    pub fn check_inputs(
        &self,
        transcript: &[TranscriptSpan],
        clips: &[BackgroundClip],
        style: &StyleConfig,
    ) -> ComposeResult<()> {
        style.check()?;
        validate_transcript(transcript)?;
        self.check_length(transcript_duration(transcript))?;
        if clips.is_empty() {
            return Err(ComposeError::NoClipsAvailable);
        }
        for clip in clips {
            clip.check()?;
        }
        Ok(())
    }

    fn check_length(&self, total: f64) -> ComposeResult<()> {
        let target = self.config.target_segment_secs;
        if total <= 0.0 || target <= 0.0 {
            return Ok(());
        }
        let segments = (total / target).ceil();
        if segments > self.config.max_segments as f64 {
            return Err(ModelError::TrackTooLong {
                duration: total,
                segments,
                limit: self.config.max_segments,
            }
            .into());
        }
        Ok(())
    }

    /// Number of segments for a track of `total` seconds (at least one).
    pub fn segment_count(&self, total: f64) -> usize {
        let target = self.config.target_segment_secs;
        if total <= 0.0 || target <= 0.0 {
            return 1;
        }
        ((total / target).ceil() as usize).max(1)
    }

    /// Build the timeline.
    pub fn build(
        &self,
        transcript: &[TranscriptSpan],
        clips: &[BackgroundClip],
        style: &StyleConfig,
    ) -> ComposeResult<Timeline> {
        self.check_inputs(transcript, clips, style)?;

        let total = transcript_duration(transcript);
        let count = self.segment_count(total);

        let mut segments: Vec<TimelineSegment> = (0..count)
            .map(|i| {
                let start_time = boundary(total, i, count);
                let end_time = boundary(total, i + 1, count);
                let transitions = transition_for(i, count, style.theme);
                TimelineSegment {
                    start_time,
                    end_time,
                    clip: clips[i % clips.len()].clone(),
                    spans: Vec::new(),
                    transition_in: transitions.transition_in,
                    transition_out: transitions.transition_out,
                }
            })
            .collect();

        for span in transcript {
            let index = owning_segment(&segments, span.start);
            segments[index].spans.push(span.clone());
        }

        debug!(
            total_duration = total,
            segments = count,
            spans = transcript.len(),
            theme = %style.theme,
            "Built timeline"
        );

        Ok(Timeline {
            segments,
            total_duration: total,
        })
    }
}

/// Boundary `i` of `count` equal pieces of `total`. The last boundary is
/// exactly `total` so no rounding gap can open at the end.
fn boundary(total: f64, i: usize, count: usize) -> f64 {
    if i >= count {
        total
    } else {
        total * i as f64 / count as f64
    }
}

/// Index of the segment owning a span that starts at `t`.
///
/// `[start, end)` everywhere except the final segment, which is closed.
fn owning_segment(segments: &[TimelineSegment], t: f64) -> usize {
    segments
        .iter()
        .position(|s| t < s.end_time)
        .unwrap_or(segments.len().saturating_sub(1))
}
