//! Opacity fade in and out.

use creel_models::{AnimationKeyframe, TranscriptSpan};

use super::KeyframeGenerator;

/// Fades a span in over the first part of its window and out over the last,
/// with a short lead and trail so neighbouring spans can cross-fade.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeSpec {
    /// Seconds the entrance starts before the span
    pub lead: f64,
    /// Seconds the exit ends after the span
    pub trail: f64,
    /// Share of the span duration spent ramping (each side)
    pub ramp_share: f64,
}

impl Default for FadeSpec {
    fn default() -> Self {
        Self {
            lead: 0.2,
            trail: 0.2,
            ramp_share: 0.1,
        }
    }
}

impl KeyframeGenerator for FadeSpec {
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe> {
        let ramp = span.duration() * self.ramp_share;
        vec![
            AnimationKeyframe::new((span.start - self.lead).max(0.0), 0.0),
            AnimationKeyframe::new(span.start + ramp, 1.0),
            AnimationKeyframe::new(span.end - ramp, 1.0),
            AnimationKeyframe::new(span.end + self.trail, 0.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_timings() {
        let kfs = FadeSpec::default().generate(&TranscriptSpan::new("hi", 1.0, 3.0));
        let times: Vec<f64> = kfs.iter().map(|k| k.time_offset).collect();
        let opacities: Vec<f64> = kfs.iter().map(|k| k.opacity).collect();

        let expected = [0.8, 1.2, 2.8, 3.2];
        for (t, e) in times.iter().zip(expected) {
            assert!((t - e).abs() < 1e-9, "{t} vs {e}");
        }
        assert_eq!(opacities, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_lead_clamped_at_track_start() {
        let kfs = FadeSpec::default().generate(&TranscriptSpan::new("hi", 0.1, 1.1));
        assert_eq!(kfs[0].time_offset, 0.0);
    }
}
