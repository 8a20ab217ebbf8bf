//! In-process rendering queue.
//!
//! Jobs run one at a time in submission order on a single worker task.
//! Submission validates inputs synchronously, so a job that reaches the
//! worker can only fail at the compositor or through a bug.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn, Instrument};

use creel_compose::{ComposeError, TimelineBuilder};
use creel_models::{JobId, JobState, RenderJob};

use crate::compositor::Compositor;
use crate::config::QueueConfig;
use crate::error::{JobFailure, QueueError, QueueResult};
use crate::job::{JobHandle, JobOutcome, QueueStatus};
use crate::logging::JobLogger;
use crate::metrics;
use crate::progress::ProgressSink;
use crate::stages::execute_job;

struct PendingJob {
    job: RenderJob,
    sink: Arc<dyn ProgressSink>,
    responder: oneshot::Sender<JobOutcome>,
}

#[derive(Default)]
struct QueueState {
    pending: HashMap<JobId, PendingJob>,
    running: Option<JobId>,
    states: HashMap<JobId, JobState>,
    /// Terminal jobs, oldest first, for bounding `states`
    finished: VecDeque<JobId>,
    closed: bool,
}

impl QueueState {
    fn finish(&mut self, id: JobId, state: JobState, history_limit: usize) {
        self.states.insert(id.clone(), state);
        self.finished.push_back(id);
        while self.finished.len() > history_limit {
            if let Some(oldest) = self.finished.pop_front() {
                self.states.remove(&oldest);
            }
        }
    }

    /// Close the queue and take every job still waiting.
    fn drain(&mut self, history_limit: usize) -> Vec<PendingJob> {
        self.closed = true;
        let drained: Vec<(JobId, PendingJob)> = self.pending.drain().collect();
        drained
            .into_iter()
            .map(|(id, pending)| {
                self.finish(id, JobState::Cancelled, history_limit);
                pending
            })
            .collect()
    }
}

struct Shared {
    state: Mutex<QueueState>,
    config: QueueConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Critical sections never panic midway, so a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-slot FIFO rendering queue.
///
/// Cloning yields another handle to the same queue. The worker stops once
/// [`shutdown`](Self::shutdown) is called or every handle is dropped.
#[derive(Clone)]
pub struct RenderingQueue {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<JobId>,
    shutdown: Arc<watch::Sender<bool>>,
    validator: TimelineBuilder,
}

impl RenderingQueue {
    /// Start a queue and its worker on the current Tokio runtime.
    pub fn start(config: QueueConfig, compositor: Arc<dyn Compositor>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let validator = TimelineBuilder::new(config.compose.clone());
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            config,
        });

        tokio::spawn(run_worker(Arc::clone(&shared), compositor, rx, shutdown_rx));
        info!(
            timeout_secs = shared.config.external_call_timeout.map(|d| d.as_secs()),
            "Rendering queue started"
        );

        Self {
            shared,
            tx,
            shutdown: Arc::new(shutdown),
            validator,
        }
    }

    /// Validate and enqueue a job.
    ///
    /// Invalid input and an empty clip pool are rejected here; the job is
    /// never queued.
    pub fn submit(&self, job: RenderJob, sink: Arc<dyn ProgressSink>) -> QueueResult<JobHandle> {
        self.validator
            .check_inputs(&job.transcript, &job.clips, &job.style)?;
        job.output_spec.check().map_err(ComposeError::from)?;

        let id = job.id.clone();
        let (responder, rx) = oneshot::channel();

        let queue_length = {
            let mut state = self.shared.lock();
            if state.closed {
                return Err(QueueError::Closed);
            }
            if state.pending.contains_key(&id) || state.states.contains_key(&id) {
                return Err(QueueError::DuplicateJob(id));
            }
            // Sent under the lock so channel order matches submission order.
            if self.tx.send(id.clone()).is_err() {
                state.closed = true;
                return Err(QueueError::Closed);
            }
            state.states.insert(id.clone(), JobState::Queued);
            state.pending.insert(
                id.clone(),
                PendingJob {
                    job,
                    sink,
                    responder,
                },
            );
            state.pending.len()
        };

        metrics::record_job_submitted();
        metrics::set_queue_length(queue_length);
        debug!(job_id = %id, queue_length, "Job queued");

        Ok(JobHandle::new(id, rx))
    }

    /// Cancel a job that has not started.
    ///
    /// Returns false for running, finished or unknown jobs.
    pub fn cancel(&self, id: &JobId) -> bool {
        let limit = self.shared.config.state_history_limit;
        let pending = {
            let mut state = self.shared.lock();
            let Some(pending) = state.pending.remove(id) else {
                if state.running.as_ref() == Some(id) {
                    debug!(job_id = %id, "Running jobs cannot be cancelled");
                }
                return false;
            };
            state.finish(id.clone(), JobState::Cancelled, limit);
            metrics::set_queue_length(state.pending.len());
            pending
        };

        let _ = pending.responder.send(Err(JobFailure::Cancelled));
        metrics::record_job_finished(JobState::Cancelled, 0.0);
        info!(job_id = %id, "Job cancelled");
        true
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.shared.lock();
        QueueStatus {
            running_job_id: state.running.clone(),
            queue_length: state.pending.len(),
        }
    }

    /// Lifecycle state of a known job.
    pub fn state_of(&self, id: &JobId) -> Option<JobState> {
        self.shared.lock().states.get(id).copied()
    }

    /// Stop accepting jobs and resolve every waiting job with
    /// [`JobFailure::QueueShutdown`]. A running job finishes first.
    pub fn shutdown(&self) {
        let drained = self.shared.lock().drain(self.shared.config.state_history_limit);
        resolve_shutdown(drained);
        metrics::set_queue_length(0);
        let _ = self.shutdown.send(true);
        info!("Rendering queue shutting down");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }
}

fn resolve_shutdown(drained: Vec<PendingJob>) {
    for pending in drained {
        metrics::record_job_finished(JobState::Cancelled, 0.0);
        let _ = pending.responder.send(Err(JobFailure::QueueShutdown));
    }
}

async fn run_worker(
    shared: Arc<Shared>,
    compositor: Arc<dyn Compositor>,
    mut rx: mpsc::UnboundedReceiver<JobId>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let limit = shared.config.state_history_limit;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let next = tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            id = rx.recv() => id,
        };
        let Some(job_id) = next else {
            break;
        };

        // Cancelled jobs leave their id in the channel; skip them.
        let pending = {
            let mut state = shared.lock();
            match state.pending.remove(&job_id) {
                Some(pending) => {
                    state.running = Some(job_id.clone());
                    state.states.insert(job_id.clone(), JobState::Running);
                    metrics::set_queue_length(state.pending.len());
                    pending
                }
                None => continue,
            }
        };

        let started = Instant::now();
        let outcome = run_isolated(pending.job, Arc::clone(&compositor), pending.sink, &shared.config).await;
        let terminal = match &outcome {
            Ok(_) => JobState::Completed,
            Err(failure) => failure.state(),
        };

        {
            let mut state = shared.lock();
            state.running = None;
            state.finish(job_id.clone(), terminal, limit);
        }
        metrics::record_job_finished(terminal, started.elapsed().as_secs_f64());

        let logger = JobLogger::new(&job_id, "render");
        if let Err(failure) = &outcome {
            logger.log_error(&failure.to_string());
        }
        if pending.responder.send(outcome).is_err() {
            debug!(job_id = %job_id, "Job handle dropped before completion");
        }

        // Let waiters observe the outcome before the next job starts.
        tokio::task::yield_now().await;
    }

    let drained = shared.lock().drain(limit);
    if !drained.is_empty() {
        warn!(pending = drained.len(), "Worker stopped with jobs still queued");
    }
    resolve_shutdown(drained);
    info!("Rendering worker stopped");
}

/// Run one job on its own task so a panicking compositor or sink cannot
/// take the worker down.
async fn run_isolated(
    job: RenderJob,
    compositor: Arc<dyn Compositor>,
    sink: Arc<dyn ProgressSink>,
    config: &QueueConfig,
) -> JobOutcome {
    let span = JobLogger::new(&job.id, "render").create_span();
    let task = tokio::spawn(execute_job(job, compositor, sink, config.clone()).instrument(span));
    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Render task aborted: {}", e);
            Err(JobFailure::Aborted(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use creel_models::{
        AudioRef, BackgroundClip, ModelError, OutputRef, OutputSpec, StyleConfig, TranscriptSpan,
    };

    use crate::compositor::CompositionRequest;
    use crate::error::CompositorError;
    use crate::progress::NoopSink;

    struct InstantCompositor;

    #[async_trait]
    impl Compositor for InstantCompositor {
        async fn composite(&self, request: CompositionRequest<'_>) -> Result<OutputRef, CompositorError> {
            Ok(OutputRef::new(request.output.path.clone(), request.timeline.total_duration))
        }
    }

    struct PanickingCompositor;

    #[async_trait]
    impl Compositor for PanickingCompositor {
        async fn composite(&self, _request: CompositionRequest<'_>) -> Result<OutputRef, CompositorError> {
            panic!("compositor bug");
        }
    }

    fn job(path: &str) -> RenderJob {
        RenderJob::new(
            AudioRef::new("audio://track.wav"),
            vec![TranscriptSpan::new("hello world", 0.0, 3.0)],
            vec![BackgroundClip::new("c1", "stock://c1.mp4", 10.0)],
            StyleConfig::default(),
            OutputSpec::new(path, 1080, 1920),
        )
    }

    #[tokio::test]
    async fn test_submit_and_complete() {
        let queue = RenderingQueue::start(QueueConfig::default(), Arc::new(InstantCompositor));
        let handle = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap();
        let id = handle.id().clone();

        let output = handle.await.unwrap();
        assert_eq!(output.uri, "out/a.mp4");
        assert_eq!(queue.state_of(&id), Some(JobState::Completed));
    }

    #[tokio::test]
    async fn test_rejects_invalid_jobs_synchronously() {
        let queue = RenderingQueue::start(QueueConfig::default(), Arc::new(InstantCompositor));

        let no_clips = job("out/a.mp4").with_clips(Vec::new());
        let err = queue.submit(no_clips, Arc::new(NoopSink)).unwrap_err();
        assert!(err.is_no_clips());

        let mut bad_output = job("out/b.mp4");
        bad_output.output_spec.fps = 0;
        let err = queue.submit(bad_output, Arc::new(NoopSink)).unwrap_err();
        assert!(matches!(err, QueueError::Rejected(ComposeError::Input(_))));

        let mut endless = job("out/c.mp4");
        endless.transcript = vec![TranscriptSpan::new("forever", 0.0, 1e20)];
        let err = queue.submit(endless, Arc::new(NoopSink)).unwrap_err();
        assert!(matches!(
            err,
            QueueError::Rejected(ComposeError::Input(ModelError::TrackTooLong { .. }))
        ));

        assert!(queue.status().is_idle());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let queue = RenderingQueue::start(QueueConfig::default(), Arc::new(InstantCompositor));
        let first = job("out/a.mp4");
        let again = first.clone();
        let handle = queue.submit(first, Arc::new(NoopSink)).unwrap();
        let err = queue.submit(again, Arc::new(NoopSink)).unwrap_err();
        assert!(matches!(err, QueueError::DuplicateJob(_)));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_compositor_does_not_kill_worker() {
        let queue = RenderingQueue::start(QueueConfig::default(), Arc::new(PanickingCompositor));
        let first = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap();
        let second = queue.submit(job("out/b.mp4"), Arc::new(NoopSink)).unwrap();

        assert!(matches!(first.await, Err(JobFailure::Aborted(_))));
        assert!(matches!(second.await, Err(JobFailure::Aborted(_))));
        assert!(queue.status().is_idle());
    }

    #[tokio::test]
    async fn test_submit_after_shutdown() {
        let queue = RenderingQueue::start(QueueConfig::default(), Arc::new(InstantCompositor));
        queue.shutdown();
        assert!(queue.is_closed());
        let err = queue.submit(job("out/a.mp4"), Arc::new(NoopSink)).unwrap_err();
        assert_eq!(err, QueueError::Closed);
    }

    #[test]
    fn test_state_history_is_bounded() {
        let mut state = QueueState::default();
        for i in 0..5 {
            state.finish(JobId::from_string(format!("job-{i}")), JobState::Completed, 3);
        }
        assert_eq!(state.states.len(), 3);
        assert!(!state.states.contains_key(&JobId::from_string("job-0")));
        assert!(state.states.contains_key(&JobId::from_string("job-4")));
    }
}
