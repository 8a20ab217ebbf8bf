//! Stage driver for one render job.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use creel_compose::{layout, prepare_layers, AnimationScheduler, TimelineBuilder};
use creel_models::{OutputRef, ProgressStage, RenderJob};

use crate::compositor::{CompositionRequest, Compositor};
use crate::config::QueueConfig;
use crate::error::{CompositorError, JobFailure};
use crate::job::JobOutcome;
use crate::logging::JobLogger;
use crate::progress::{ProgressSink, ProgressTracker};

/// Run the fixed stage sequence for `job`.
///
/// Emits one event per stage at the stage floor and a final export event at
/// 100 on success. A failed stage ends the job; no later stage runs.
pub(crate) async fn execute_job(
    job: RenderJob,
    compositor: Arc<dyn Compositor>,
    sink: Arc<dyn ProgressSink>,
    config: QueueConfig,
) -> JobOutcome {
    let logger = JobLogger::new(&job.id, "render");
    let mut progress = ProgressTracker::new(job.id.clone(), sink);
    let deadline = config.external_call_timeout;

    logger.log_start(&format!(
        "{} spans, {} clips, theme {}",
        job.transcript.len(),
        job.clips.len(),
        job.style.theme
    ));
    if job.transcript.is_empty() {
        logger.log_warning("empty transcript, rendering a single background segment");
    }

    enter(&mut progress, &logger, ProgressStage::Timeline, "Building timeline");
    let timeline = TimelineBuilder::new(config.compose.clone())
        .build(&job.transcript, &job.clips, &job.style)
        .map_err(|error| JobFailure::Stage {
            stage: ProgressStage::Timeline,
            error,
        })?;

    enter(
        &mut progress,
        &logger,
        ProgressStage::Layers,
        format!("Preparing {} background layers", timeline.len()),
    );
    let layers = prepare_layers(&timeline);

    enter(
        &mut progress,
        &logger,
        ProgressStage::TextAnimation,
        format!("Animating {} captions", job.transcript.len()),
    );
    let animations = AnimationScheduler::new().schedule(&job.transcript, &job.style);
    let text_layout = layout(&job.transcript, &job.style, job.output_spec.canvas());

    enter(&mut progress, &logger, ProgressStage::Merge, "Compositing video");
    let request = CompositionRequest {
        job_id: &job.id,
        audio: &job.track,
        timeline: &timeline,
        layers: &layers,
        animations: &animations,
        layout: &text_layout,
        output: &job.output_spec,
    };
    let merged = external(ProgressStage::Merge, deadline, compositor.composite(request)).await?;

    enter(&mut progress, &logger, ProgressStage::Transitions, "Applying transitions");
    let rendered = external(
        ProgressStage::Transitions,
        deadline,
        compositor.apply_transitions(&merged, &layers),
    )
    .await?;

    enter(&mut progress, &logger, ProgressStage::Export, "Exporting");
    let output = external(
        ProgressStage::Export,
        deadline,
        compositor.export(&rendered, &job.output_spec),
    )
    .await?;

    progress.complete("Render complete");
    logger.log_completion(&output.uri);
    Ok(output)
}

fn enter(
    progress: &mut ProgressTracker,
    logger: &JobLogger,
    stage: ProgressStage,
    message: impl Into<String>,
) {
    let percent = progress.enter(stage, message);
    logger.log_stage(stage, percent);
}

/// Await a compositor call under the configured deadline.
async fn external<F>(
    stage: ProgressStage,
    deadline: Option<Duration>,
    call: F,
) -> Result<OutputRef, JobFailure>
where
    F: Future<Output = Result<OutputRef, CompositorError>>,
{
    let result = match deadline {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(CompositorError::Timeout(limit)),
        },
        None => call.await,
    };
    result.map_err(|error| JobFailure::External { stage, error })
}
