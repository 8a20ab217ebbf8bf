//! Transition policy.
//!
//! Maps (segment index, segment count, theme) to the entry and exit
//! transitions of a segment. The first segment opens the track, the last
//! one always fades out, and everything in between uses the theme's
//! signature transition.

use creel_models::{Theme, TransitionKind};

/// Longest transition in seconds.
pub const MAX_TRANSITION_SECS: f64 = 0.5;

/// Share of a segment a single transition may occupy. Two of them (in + out)
/// stay below the full segment length, so they never overlap.
pub const MAX_TRANSITION_SHARE: f64 = 0.25;

/// Entry/exit pair for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTransitions {
    pub transition_in: TransitionKind,
    pub transition_out: TransitionKind,
}

/// Transition used between segments for a theme.
pub fn theme_transition(theme: Theme) -> TransitionKind {
    match theme {
        Theme::Nature | Theme::Minimal => TransitionKind::Fade,
        Theme::City | Theme::Colorful => TransitionKind::Slide,
        Theme::Abstract => TransitionKind::Zoom,
        Theme::Other => TransitionKind::Fade,
    }
}

/// How the very first segment enters.
pub fn opening_transition(theme: Theme) -> TransitionKind {
    match theme {
        Theme::Minimal => TransitionKind::None,
        _ => TransitionKind::Fade,
    }
}

/// Transitions for segment `index` of `total`.
///
/// `total == 0` is treated like a single segment.
pub fn transition_for(index: usize, total: usize, theme: Theme) -> SegmentTransitions {
    let last = total.saturating_sub(1);
    let (transition_in, transition_out) = if total <= 1 {
        (opening_transition(theme), TransitionKind::Fade)
    } else if index == 0 {
        (opening_transition(theme), theme_transition(theme))
    } else if index >= last {
        (TransitionKind::None, TransitionKind::Fade)
    } else {
        let kind = theme_transition(theme);
        (kind, kind)
    };

    SegmentTransitions {
        transition_in,
        transition_out,
    }
}

/// Duration of a transition inside a segment of `segment_len` seconds.
pub fn transition_duration(kind: TransitionKind, segment_len: f64) -> f64 {
    if kind.is_none() || segment_len <= 0.0 {
        return 0.0;
    }
    MAX_TRANSITION_SECS.min(segment_len * MAX_TRANSITION_SHARE)
}
