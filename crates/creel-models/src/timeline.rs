//! Timeline segments and transitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BackgroundClip, TranscriptSpan};

/// Transition applied at a segment boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Fade,
    Slide,
    Zoom,
    #[default]
    None,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::Slide => "slide",
            TransitionKind::Zoom => "zoom",
            TransitionKind::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TransitionKind::None)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A contiguous slice of the track bound to one background clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub clip: BackgroundClip,
    /// Spans whose start falls inside this segment
    pub spans: Vec<TranscriptSpan>,
    pub transition_in: TransitionKind,
    pub transition_out: TransitionKind,
}

impl TimelineSegment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Half-open membership test `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        self.start_time <= t && t < self.end_time
    }
}

/// Ordered segments tiling `[0, total_duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timeline {
    pub segments: Vec<TimelineSegment>,
    pub total_duration: f64,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_lengths_sum(&self) -> f64 {
        self.segments.iter().map(TimelineSegment::duration).sum()
    }

    /// Segment owning time `t`; the final segment also owns its end point.
    pub fn segment_at(&self, t: f64) -> Option<&TimelineSegment> {
        if let Some(seg) = self.segments.iter().find(|s| s.contains(t)) {
            return Some(seg);
        }
        self.segments.last().filter(|last| t == last.end_time)
    }

    /// Number of spans across all segments.
    pub fn span_count(&self) -> usize {
        self.segments.iter().map(|s| s.spans.len()).sum()
    }

    /// True when segments start at 0, end at `total_duration`, and each
    /// segment starts where the previous one ended (within `epsilon`).
    pub fn is_exact_tiling(&self, epsilon: f64) -> bool {
        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return false,
        };
        if first.start_time.abs() > epsilon
            || (last.end_time - self.total_duration).abs() > epsilon
        {
            return false;
        }
        let contiguous = self
            .segments
            .windows(2)
            .all(|pair| (pair[1].start_time - pair[0].end_time).abs() <= epsilon);
        contiguous && (self.segment_lengths_sum() - self.total_duration).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64) -> TimelineSegment {
        TimelineSegment {
            start_time: start,
            end_time: end,
            clip: BackgroundClip::new("c", "s", 5.0),
            spans: Vec::new(),
            transition_in: TransitionKind::None,
            transition_out: TransitionKind::Fade,
        }
    }

    #[test]
    fn test_tiling_check() {
        let timeline = Timeline {
            segments: vec![segment(0.0, 5.0), segment(5.0, 10.0)],
            total_duration: 10.0,
        };
        assert!(timeline.is_exact_tiling(1e-9));

        let gap = Timeline {
            segments: vec![segment(0.0, 4.0), segment(5.0, 10.0)],
            total_duration: 10.0,
        };
        assert!(!gap.is_exact_tiling(1e-9));
    }

    #[test]
    fn test_segment_at_end_boundary() {
        let timeline = Timeline {
            segments: vec![segment(0.0, 5.0), segment(5.0, 10.0)],
            total_duration: 10.0,
        };
        assert_eq!(timeline.segment_at(5.0).map(|s| s.start_time), Some(5.0));
        assert_eq!(timeline.segment_at(10.0).map(|s| s.start_time), Some(5.0));
        assert!(timeline.segment_at(10.5).is_none());
    }
}
