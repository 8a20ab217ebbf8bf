//! Progress delivery.
//!
//! Sinks are called synchronously from the worker, so they must return
//! quickly. [`ChannelSink`] drops events instead of waiting when its buffer
//! is full.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use creel_models::{JobId, ProgressEvent, ProgressStage};

/// Receives progress events for one job.
///
/// Called on the worker task: a sink that blocks stalls the whole queue.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Forwards events into a bounded channel.
///
/// Sending never waits. When the buffer is full the event is dropped,
/// including the final `Export` event at 100, so a receiver that falls behind
/// cannot rely on seeing 100. Await the [`JobHandle`](crate::JobHandle) for
/// completion and treat the channel as advisory.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Err(e) = self.tx.try_send(event.clone()) {
            debug!(job_id = %event.job_id, "Dropped progress event: {}", e);
        }
    }
}

/// Create a channel-backed sink and its receiver.
pub fn progress_channel(capacity: usize) -> (Arc<ChannelSink>, mpsc::Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Arc::new(ChannelSink::new(tx)), rx)
}

/// Emits one job's events, keeping percent within `[0, 100]` and never
/// letting it go backwards.
pub struct ProgressTracker {
    job_id: JobId,
    sink: Arc<dyn ProgressSink>,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(job_id: JobId, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            job_id,
            sink,
            last: None,
        }
    }

    /// Emit an event; `percent` is raised to the last emitted value if lower.
    pub fn emit(&mut self, stage: ProgressStage, percent: u8, message: impl Into<String>) -> u8 {
        let percent = percent.min(100).max(self.last.unwrap_or(0));
        let event = ProgressEvent::new(self.job_id.clone(), stage, percent, message);
        self.sink.on_progress(&event);
        self.last = Some(percent);
        percent
    }

    /// Report the start of a stage at its floor.
    pub fn enter(&mut self, stage: ProgressStage, message: impl Into<String>) -> u8 {
        self.emit(stage, stage.floor(), message)
    }

    /// Report successful completion.
    pub fn complete(&mut self, message: impl Into<String>) -> u8 {
        self.emit(ProgressStage::Export, 100, message)
    }

    pub fn last_percent(&self) -> Option<u8> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (Arc<Mutex<Vec<ProgressEvent>>>, Arc<dyn ProgressSink>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&events);
        let sink: Arc<dyn ProgressSink> = Arc::new(move |e: &ProgressEvent| {
            captured.lock().unwrap().push(e.clone());
        });
        (events, sink)
    }

    #[test]
    fn test_tracker_is_monotonic() {
        let (events, sink) = recording();
        let mut tracker = ProgressTracker::new(JobId::from_string("job-1"), sink);

        assert_eq!(tracker.enter(ProgressStage::Merge, "merge"), 40);
        assert_eq!(tracker.emit(ProgressStage::Merge, 55, "halfway"), 55);
        // Regressions are held at the previous value.
        assert_eq!(tracker.enter(ProgressStage::Layers, "late"), 55);
        assert_eq!(tracker.emit(ProgressStage::Export, 240, "overflow"), 100);

        let percents: Vec<u8> = events.lock().unwrap().iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![40, 55, 55, 100]);
        assert!(events.lock().unwrap().iter().all(|e| e.job_id.as_str() == "job-1"));
    }

    #[test]
    fn test_complete_reports_export_at_100() {
        let (events, sink) = recording();
        let mut tracker = ProgressTracker::new(JobId::new(), sink);
        tracker.complete("done");
        let events = events.lock().unwrap();
        assert_eq!(events[0].stage, ProgressStage::Export);
        assert_eq!(events[0].percent, 100);
    }

    #[tokio::test]
    async fn test_channel_sink_drops_when_full() {
        let (sink, mut rx) = progress_channel(1);
        let job_id = JobId::new();
        sink.on_progress(&ProgressEvent::new(job_id.clone(), ProgressStage::Timeline, 0, "a"));
        sink.on_progress(&ProgressEvent::new(job_id, ProgressStage::Layers, 10, "b"));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, "a");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_channel_sink_can_lose_completion() {
        let (sink, mut rx) = progress_channel(1);
        let mut tracker = ProgressTracker::new(JobId::new(), sink);
        tracker.enter(ProgressStage::Export, "exporting");
        tracker.complete("done");

        assert_eq!(tracker.last_percent(), Some(100));
        assert_eq!(rx.recv().await.unwrap().percent, 80);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_noop_sink() {
        let mut tracker = ProgressTracker::new(JobId::new(), Arc::new(NoopSink));
        assert_eq!(tracker.last_percent(), None);
        tracker.enter(ProgressStage::Timeline, "start");
        assert_eq!(tracker.last_percent(), Some(0));
    }
}
