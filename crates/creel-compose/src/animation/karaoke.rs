//! Karaoke colour sweep.

use creel_models::{AnimationKeyframe, TranscriptSpan};

use super::KeyframeGenerator;

/// Minimum animated window in seconds, so very short words still visibly light up.
pub const MIN_KARAOKE_SECS: f64 = 0.5;

/// Sweeps the text colour from the base colour to the highlight and back
/// across the span window.
#[derive(Debug, Clone, PartialEq)]
pub struct KaraokeSpec {
    pub base_color: String,
    pub highlight_color: String,
    pub min_duration: f64,
}

impl KaraokeSpec {
    pub fn new(base_color: impl Into<String>, highlight_color: impl Into<String>) -> Self {
        Self {
            base_color: base_color.into(),
            highlight_color: highlight_color.into(),
            min_duration: MIN_KARAOKE_SECS,
        }
    }
}

impl KeyframeGenerator for KaraokeSpec {
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe> {
        let duration = span.duration().max(self.min_duration);
        vec![
            AnimationKeyframe::new(span.start, 1.0).with_color(&self.base_color),
            AnimationKeyframe::new(span.start + duration / 2.0, 1.0)
                .with_color(&self.highlight_color),
            AnimationKeyframe::new(span.start + duration, 1.0).with_color(&self.base_color),
        ]
    }
}
