//! End-to-end behaviour of the rendering queue.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use creel_models::{
    AudioRef, BackgroundClip, JobId, JobState, OutputRef, OutputSpec, ProgressEvent,
    ProgressStage, RenderJob, StyleConfig, TranscriptSpan,
};
use creel_queue::{
    CompositionRequest, Compositor, CompositorError, JobFailure, NoopSink, ProgressSink,
    QueueConfig, QueueError, RenderingQueue,
};

/// Records merge order; paths containing "bad" fail and "slow" never return.
/// With a gate, every merge waits for a permit first.
#[derive(Default)]
struct ScriptedCompositor {
    merged: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedCompositor {
    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            merged: Mutex::new(Vec::new()),
            gate: Some(gate),
        }
    }

    fn merged(&self) -> Vec<String> {
        self.merged.lock().unwrap().clone()
    }
}

#[async_trait]
impl Compositor for ScriptedCompositor {
    async fn composite(&self, request: CompositionRequest<'_>) -> Result<OutputRef, CompositorError> {
        let path = request.output.path.clone();
        self.merged.lock().unwrap().push(path.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| CompositorError::unavailable("gate closed"))?
                .forget();
        }
        if path.contains("slow") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if path.contains("bad") {
            return Err(CompositorError::failed("encoder rejected input"));
        }
        Ok(OutputRef::new(path, request.timeline.total_duration))
    }
}

fn job(path: &str) -> RenderJob {
    RenderJob::new(
        AudioRef::new("audio://track.wav"),
        vec![
            TranscriptSpan::new("rivers carve valleys", 0.0, 6.0),
            TranscriptSpan::new("slowly over time", 6.0, 14.0),
        ],
        vec![
            BackgroundClip::new("c1", "stock://c1.mp4", 10.0),
            BackgroundClip::new("c2", "stock://c2.mp4", 10.0),
        ],
        StyleConfig::default(),
        OutputSpec::new(path, 1080, 1920),
    )
}

fn recording() -> (Arc<Mutex<Vec<ProgressEvent>>>, Arc<dyn ProgressSink>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&events);
    let sink: Arc<dyn ProgressSink> = Arc::new(move |e: &ProgressEvent| {
        captured.lock().unwrap().push(e.clone());
    });
    (events, sink)
}

async fn wait_until_running(queue: &RenderingQueue, id: &JobId) {
    for _ in 0..400 {
        if queue.status().running_job_id.as_ref() == Some(id) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {id} never started");
}

#[tokio::test]
async fn test_jobs_complete_in_submission_order() {
    let compositor = Arc::new(ScriptedCompositor::default());
    let queue = RenderingQueue::start(QueueConfig::default(), compositor.clone());

    let finished = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();
    for name in ["a", "b", "c"] {
        let finished = Arc::clone(&finished);
        let label = name.to_string();
        let sink: Arc<dyn ProgressSink> = Arc::new(move |e: &ProgressEvent| {
            if e.percent == 100 {
                finished.lock().unwrap().push(label.clone());
            }
        });
        handles.push(queue.submit(job(&format!("out/{name}.mp4")), sink).unwrap());
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(compositor.merged(), vec!["out/a.mp4", "out/b.mp4", "out/c.mp4"]);
    assert_eq!(*finished.lock().unwrap(), vec!["a", "b", "c"]);
    assert!(queue.status().is_idle());
}

#[tokio::test]
async fn test_failure_does_not_affect_later_jobs() {
    let compositor = Arc::new(ScriptedCompositor::default());
    let queue = RenderingQueue::start(QueueConfig::default(), compositor.clone());

    let a = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap();
    let b = queue.submit(job("out/bad.mp4"), Arc::new(NoopSink)).unwrap();
    let c = queue.submit(job("out/c.mp4"), Arc::new(NoopSink)).unwrap();
    let b_id = b.id().clone();

    assert!(a.await.is_ok());
    match b.await {
        Err(JobFailure::External { stage, error }) => {
            assert_eq!(stage, ProgressStage::Merge);
            assert_eq!(error, CompositorError::failed("encoder rejected input"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(c.await.unwrap().uri, "out/c.mp4");
    assert_eq!(queue.state_of(&b_id), Some(JobState::Failed));
}

#[tokio::test]
async fn test_cancel_only_affects_queued_jobs() {
    let gate = Arc::new(Semaphore::new(0));
    let compositor = Arc::new(ScriptedCompositor::gated(Arc::clone(&gate)));
    let queue = RenderingQueue::start(QueueConfig::default(), compositor.clone());

    let a = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap();
    let (b_events, b_sink) = recording();
    let b = queue.submit(job("out/b.mp4"), b_sink).unwrap();
    let c = queue.submit(job("out/c.mp4"), Arc::new(NoopSink)).unwrap();
    let (a_id, b_id) = (a.id().clone(), b.id().clone());

    wait_until_running(&queue, &a_id).await;
    assert_eq!(queue.status().queue_length, 2);

    assert!(!queue.cancel(&a_id), "running job must not be cancellable");
    assert!(queue.cancel(&b_id));
    assert!(!queue.cancel(&b_id), "second cancel is a no-op");
    assert_eq!(queue.state_of(&b_id), Some(JobState::Cancelled));

    gate.add_permits(2);

    assert!(a.await.is_ok());
    assert_eq!(b.await, Err(JobFailure::Cancelled));
    assert!(c.await.is_ok());

    assert_eq!(compositor.merged(), vec!["out/a.mp4", "out/c.mp4"]);
    assert!(b_events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_100() {
    let queue = RenderingQueue::start(
        QueueConfig::default(),
        Arc::new(ScriptedCompositor::default()),
    );
    let (events, sink) = recording();
    let handle = queue.submit(job("out/a.mp4"), sink).unwrap();
    let job_id = handle.id().clone();
    handle.await.unwrap();

    let events = events.lock().unwrap();
    assert!(events.iter().all(|e| e.job_id == job_id));
    for pair in events.windows(2) {
        assert!(pair[0].percent <= pair[1].percent);
        assert!(pair[0].stage <= pair[1].stage);
    }
    let last = events.last().unwrap();
    assert_eq!((last.stage, last.percent), (ProgressStage::Export, 100));

    let stages: Vec<ProgressStage> = events.iter().map(|e| e.stage).collect();
    for stage in ProgressStage::ALL {
        assert!(stages.contains(&stage), "missing {stage}");
    }
}

#[tokio::test]
async fn test_stuck_compositor_times_out() {
    let config = QueueConfig::default().with_external_call_timeout(Some(Duration::from_millis(50)));
    let queue = RenderingQueue::start(config, Arc::new(ScriptedCompositor::default()));

    let stuck = queue.submit(job("out/slow.mp4"), Arc::new(NoopSink)).unwrap();
    let next = queue.submit(job("out/next.mp4"), Arc::new(NoopSink)).unwrap();

    match stuck.await {
        Err(JobFailure::External { stage, error }) => {
            assert_eq!(stage, ProgressStage::Merge);
            assert!(matches!(error, CompositorError::Timeout(_)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(next.await.unwrap().uri, "out/next.mp4");
}

#[tokio::test]
async fn test_shutdown_resolves_waiting_jobs() {
    let gate = Arc::new(Semaphore::new(0));
    let queue = RenderingQueue::start(
        QueueConfig::default(),
        Arc::new(ScriptedCompositor::gated(Arc::clone(&gate))),
    );

    let a = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap();
    let b = queue.submit(job("out/b.mp4"), Arc::new(NoopSink)).unwrap();
    wait_until_running(&queue, a.id()).await;

    queue.shutdown();
    assert_eq!(b.await, Err(JobFailure::QueueShutdown));
    assert_eq!(
        queue.submit(job("out/c.mp4"), Arc::new(NoopSink)).unwrap_err(),
        QueueError::Closed
    );

    // The running job still finishes.
    gate.add_permits(1);
    assert_eq!(a.await.unwrap().uri, "out/a.mp4");
}
