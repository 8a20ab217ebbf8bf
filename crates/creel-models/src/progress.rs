//! Progress events emitted while a render job executes.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::JobId;

/// Fixed stage sequence of a render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Timeline,
    Layers,
    TextAnimation,
    Merge,
    Transitions,
    Export,
}

impl ProgressStage {
    /// Stages in execution order.
    pub const ALL: [ProgressStage; 6] = [
        ProgressStage::Timeline,
        ProgressStage::Layers,
        ProgressStage::TextAnimation,
        ProgressStage::Merge,
        ProgressStage::Transitions,
        ProgressStage::Export,
    ];

    /// Percent reported when the stage starts.
    pub fn floor(&self) -> u8 {
        match self {
            ProgressStage::Timeline => 0,
            ProgressStage::Layers => 10,
            ProgressStage::TextAnimation => 25,
            ProgressStage::Merge => 40,
            ProgressStage::Transitions => 60,
            ProgressStage::Export => 80,
        }
    }

    /// Percent reached once the stage has finished.
    pub fn ceiling(&self) -> u8 {
        match self {
            ProgressStage::Timeline => 10,
            ProgressStage::Layers => 25,
            ProgressStage::TextAnimation => 40,
            ProgressStage::Merge => 60,
            ProgressStage::Transitions => 80,
            ProgressStage::Export => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::Timeline => "timeline",
            ProgressStage::Layers => "layers",
            ProgressStage::TextAnimation => "text_animation",
            ProgressStage::Merge => "merge",
            ProgressStage::Transitions => "transitions",
            ProgressStage::Export => "export",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One progress update for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressEvent {
    pub job_id: JobId,
    pub stage: ProgressStage,
    /// Percent complete in `[0, 100]`
    pub percent: u8,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(job_id: JobId, stage: ProgressStage, percent: u8, message: impl Into<String>) -> Self {
        Self {
            job_id,
            stage,
            percent: percent.min(100),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_floors_increase() {
        let floors: Vec<u8> = ProgressStage::ALL.iter().map(|s| s.floor()).collect();
        assert_eq!(floors, vec![0, 10, 25, 40, 60, 80]);
        for stage in ProgressStage::ALL {
            assert!(stage.floor() < stage.ceiling());
        }
    }

    #[test]
    fn test_event_percent_clamped() {
        let event = ProgressEvent::new(JobId::new(), ProgressStage::Export, 250, "done");
        assert_eq!(event.percent, 100);
    }
}
