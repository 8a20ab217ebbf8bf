//! Background layer preparation.

use serde::{Deserialize, Serialize};

use creel_models::{Timeline, TransitionKind};

use crate::transitions::transition_duration;

/// One background layer handed to the compositor: a clip trimmed or looped
/// to fill its segment, with resolved transition lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayer {
    pub segment_index: usize,
    pub clip_id: String,
    pub source_ref: String,
    pub start: f64,
    pub length: f64,
    /// Times the clip must play back-to-back to cover `length` (at least 1)
    pub loops: u32,
    pub transition_in: TransitionKind,
    pub transition_out: TransitionKind,
    pub transition_in_secs: f64,
    pub transition_out_secs: f64,
}

impl BackgroundLayer {
    /// Window `[start, end]` occupied by the entry transition.
    pub fn entry_window(&self) -> (f64, f64) {
        (self.start, self.start + self.transition_in_secs)
    }

    /// Window `[start, end]` occupied by the exit transition.
    pub fn exit_window(&self) -> (f64, f64) {
        let end = self.start + self.length;
        (end - self.transition_out_secs, end)
    }
}

/// One layer per timeline segment, in timeline order.
pub fn prepare_layers(timeline: &Timeline) -> Vec<BackgroundLayer> {
    timeline
        .segments
        .iter()
        .enumerate()
        .map(|(segment_index, seg)| {
            let length = seg.duration();
            BackgroundLayer {
                segment_index,
                clip_id: seg.clip.id.clone(),
                source_ref: seg.clip.source_ref.clone(),
                start: seg.start_time,
                length,
                loops: loops_needed(length, seg.clip.duration_seconds),
                transition_in: seg.transition_in,
                transition_out: seg.transition_out,
                transition_in_secs: transition_duration(seg.transition_in, length),
                transition_out_secs: transition_duration(seg.transition_out, length),
            }
        })
        .collect()
}

fn loops_needed(length: f64, clip_secs: f64) -> u32 {
    if length <= 0.0 || clip_secs <= 0.0 {
        return 1;
    }
    ((length / clip_secs).ceil() as u32).max(1)
}
