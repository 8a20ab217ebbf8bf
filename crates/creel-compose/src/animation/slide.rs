//! Slide in from off-canvas.

use creel_models::{AnimationKeyframe, Transform, TranscriptSpan};

use super::KeyframeGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct SlideSpec {
    /// Starting horizontal offset in canvas widths (-1.0 is fully off the left edge)
    pub offset_x: f64,
    /// Share of the span duration spent moving into place
    pub ramp_share: f64,
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self {
            offset_x: -1.0,
            ramp_share: 0.3,
        }
    }
}

impl KeyframeGenerator for SlideSpec {
    fn generate(&self, span: &TranscriptSpan) -> Vec<AnimationKeyframe> {
        let arrived = span.start + span.duration() * self.ramp_share;
        vec![
            AnimationKeyframe::new(span.start, 0.0)
                .with_transform(Transform::translated(self.offset_x, 0.0)),
            AnimationKeyframe::new(arrived, 1.0),
            AnimationKeyframe::new(span.end, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_arrives_at_thirty_percent() {
        let kfs = SlideSpec::default().generate(&TranscriptSpan::new("go", 10.0, 20.0));
        assert_eq!(kfs[0].transform.translate_x, -1.0);
        assert_eq!(kfs[0].opacity, 0.0);
        assert!((kfs[1].time_offset - 13.0).abs() < 1e-9);
        assert_eq!(kfs[1].transform, Transform::IDENTITY);
        assert_eq!(kfs[2].time_offset, 20.0);
    }
}
