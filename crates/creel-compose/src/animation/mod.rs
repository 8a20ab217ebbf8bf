//! Caption animation scheduling.
//!
//! Each animation style is a small parameter set with its own keyframe generator.
//! Spans are scheduled independently of each other, so the whole transcript
//! is computed in parallel and reassembled in transcript order.

use rayon::prelude::*;
use tracing::debug;

use creel_models::{AnimationKeyframe, AnimationType, SpanAnimation, StyleConfig, TranscriptSpan};

pub mod bounce;
pub mod fade;
pub mod karaoke;
pub mod slide;

pub use bounce::BounceSpec;
pub use fade::FadeSpec;
pub use karaoke::KaraokeSpec;
pub use slide::SlideSpec;

/// Produces the keyframes of one span.
pub trait KeyframeGenerator {
    /// Keyframes ordered by non-decreasing `time_offset`.
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe>;
}

/// Closed set of animation styles.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSpec {
    Fade(FadeSpec),
    Karaoke(KaraokeSpec),
    Bounce(BounceSpec),
    Slide(SlideSpec),
}

impl AnimationSpec {
    /// Parameters for a style; unspecified animation types fall back to fade.
    pub fn from_style(style: &StyleConfig) -> Self {
        match style.animation_type {
            AnimationType::Fade | AnimationType::Unspecified => Self::Fade(FadeSpec::default()),
            AnimationType::Karaoke => Self::Karaoke(KaraokeSpec::new(
                style.font_color.clone(),
                style.highlight_color().to_string(),
            )),
            AnimationType::Bounce => Self::Bounce(BounceSpec::default()),
            AnimationType::Slide => Self::Slide(SlideSpec::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationSpec::Fade(_) => "fade",
            AnimationSpec::Karaoke(_) => "karaoke",
            AnimationSpec::Bounce(_) => "bounce",
            AnimationSpec::Slide(_) => "slide",
        }
    }
}

impl KeyframeGenerator for AnimationSpec {
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe> {
        match self {
            AnimationSpec::Fade(spec) => spec.generate(span),
            AnimationSpec::Karaoke(spec) => spec.generate(span),
            AnimationSpec::Bounce(spec) => spec.generate(span),
            AnimationSpec::Slide(spec) => spec.generate(span),
        }
    }
}

/// Computes keyframe schedules for a transcript.
#[derive(Debug, Clone, Default)]
pub struct AnimationScheduler;

impl AnimationScheduler {
    pub fn new() -> Self {
        Self
    }

    /// One [`SpanAnimation`] per span, in transcript order.
    pub fn schedule(&self, spans: &[TranscriptSpan], style: &StyleConfig) -> Vec<SpanAnimation> {
        let spec = AnimationSpec::from_style(style);
        let schedule: Vec<SpanAnimation> = spans
            .par_iter()
            .enumerate()
            .map(|(span_index, span)| SpanAnimation {
                span_index,
                keyframes: spec.generate(span),
            })
            .collect();

        debug!(
            animation = spec.name(),
            spans = spans.len(),
            "Scheduled caption animation"
        );
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Vec<TranscriptSpan> {
        vec![
            TranscriptSpan::new("one", 0.0, 0.4),
            TranscriptSpan::new("two", 0.3, 2.0),
            TranscriptSpan::new("three", 2.5, 2.6),
            TranscriptSpan::new("four", 7.0, 12.0),
        ]
    }

    fn all_types() -> [AnimationType; 5] {
        [
            AnimationType::Fade,
            AnimationType::Karaoke,
            AnimationType::Bounce,
            AnimationType::Slide,
            AnimationType::Unspecified,
        ]
    }

    #[test]
    fn test_schedule_preserves_order() {
        let spans = transcript();
        let schedule = AnimationScheduler::new().schedule(&spans, &StyleConfig::default());
        assert_eq!(schedule.len(), spans.len());
        for (i, anim) in schedule.iter().enumerate() {
            assert_eq!(anim.span_index, i);
        }
    }

    #[test]
    fn test_keyframes_sorted_and_opacity_bounded() {
        let spans = transcript();
        for animation_type in all_types() {
            let style = StyleConfig::default().with_animation(animation_type);
            for anim in AnimationScheduler::new().schedule(&spans, &style) {
                assert!(!anim.keyframes.is_empty());
                for pair in anim.keyframes.windows(2) {
                    assert!(
                        pair[0].time_offset <= pair[1].time_offset,
                        "{animation_type}: {:?}",
                        anim.keyframes
                    );
                }
                for kf in &anim.keyframes {
                    assert!((0.0..=1.0).contains(&kf.opacity));
                    assert!(kf.time_offset >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_unspecified_falls_back_to_fade() {
        let spans = transcript();
        let fade = AnimationScheduler::new()
            .schedule(&spans, &StyleConfig::default().with_animation(AnimationType::Fade));
        let unspecified = AnimationScheduler::new().schedule(
            &spans,
            &StyleConfig::default().with_animation(AnimationType::Unspecified),
        );
        assert_eq!(fade, unspecified);
    }

    #[test]
    fn test_spans_scheduled_independently() {
        let spans = transcript();
        let style = StyleConfig::default().with_animation(AnimationType::Bounce);
        let whole = AnimationScheduler::new().schedule(&spans, &style);
        let alone = AnimationScheduler::new().schedule(&spans[3..], &style);
        assert_eq!(whole[3].keyframes, alone[0].keyframes);
    }
}
