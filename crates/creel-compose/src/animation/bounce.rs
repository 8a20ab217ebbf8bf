//! Scale pulse on entry.

use creel_models::{AnimationKeyframe, Transform, TranscriptSpan};

use super::KeyframeGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct BounceSpec {
    /// Seconds before the span the pulse begins
    pub lead: f64,
    /// Seconds after the span start the text settles
    pub settle: f64,
    pub entry_scale: f64,
    pub overshoot_scale: f64,
    /// Vertical offsets in canvas fractions (positive is down)
    pub entry_offset_y: f64,
    pub overshoot_offset_y: f64,
}

impl Default for BounceSpec {
    fn default() -> Self {
        Self {
            lead: 0.1,
            settle: 0.1,
            entry_scale: 0.6,
            overshoot_scale: 1.2,
            entry_offset_y: 0.05,
            overshoot_offset_y: -0.02,
        }
    }
}

impl KeyframeGenerator for BounceSpec {
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe> {
        let settled_at = span.start + self.settle;
        let entry = Transform {
            scale: self.entry_scale,
            translate_x: 0.0,
            translate_y: self.entry_offset_y,
        };
        let peak = Transform {
            scale: self.overshoot_scale,
            translate_x: 0.0,
            translate_y: self.overshoot_offset_y,
        };

        vec![
            AnimationKeyframe::new((span.start - self.lead).max(0.0), 0.0).with_transform(entry),
            AnimationKeyframe::new(span.start, 1.0).with_transform(peak),
            AnimationKeyframe::new(settled_at, 1.0),
            AnimationKeyframe::new(span.end.max(settled_at), 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_then_hold() {
        let kfs = BounceSpec::default().generate(&TranscriptSpan::new("pop", 1.0, 2.0));
        assert!((kfs[0].time_offset - 0.9).abs() < 1e-9);
        assert_eq!(kfs[1].transform.scale, 1.2);
        assert!((kfs[2].time_offset - 1.1).abs() < 1e-9);
        assert_eq!(kfs[2].transform, Transform::IDENTITY);
        assert_eq!(kfs[3].time_offset, 2.0);
    }

    #[test]
    fn test_hold_never_before_settle() {
        let kfs = BounceSpec::default().generate(&TranscriptSpan::new("t", 1.0, 1.05));
        assert!(kfs[3].time_offset >= kfs[2].time_offset);
    }
}
