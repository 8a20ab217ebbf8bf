//! Project pipeline: everything that happens before a job reaches the queue.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use creel_compose::KeywordExtractor;
use creel_models::{
    AudioRef, BackgroundClip, ClipOrigin, OutputSpec, RenderJob, StyleConfig, Theme, TranscriptSpan,
};
use creel_queue::{JobHandle, ProgressSink, RenderingQueue};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::providers::{ClipProvider, ProviderError, TranscriptionProvider};
use crate::retry::{retry_async_when, RetryResult};

/// Length of each generated fallback clip in seconds.
pub const GENERATED_CLIP_SECS: f64 = 10.0;

/// What the caller asks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub track: AudioRef,
    #[serde(default)]
    pub style: StyleConfig,
    pub output_spec: OutputSpec,
}

impl ProjectRequest {
    pub fn new(track: AudioRef, style: StyleConfig, output_spec: OutputSpec) -> Self {
        Self {
            track,
            style,
            output_spec,
        }
    }
}

/// Solid-colour clips used when stock search yields nothing.
pub fn default_clip_set(theme: Theme) -> Vec<BackgroundClip> {
    let palette: &[&str] = match theme {
        Theme::Nature => &["2E7D32", "1565C0", "F9A825"],
        Theme::City => &["263238", "455A64", "FF6F00"],
        Theme::Abstract => &["6A1B9A", "00838F", "AD1457"],
        Theme::Minimal => &["FAFAFA", "EEEEEE", "BDBDBD"],
        Theme::Colorful => &["E53935", "FDD835", "1E88E5"],
        Theme::Other => &["424242", "616161", "757575"],
    };

    palette
        .iter()
        .enumerate()
        .map(|(i, hex)| {
            BackgroundClip::new(
                format!("default-{}-{}", theme, i),
                format!("generated://solid/{}", hex),
                GENERATED_CLIP_SECS,
            )
            .with_keywords([theme.as_str(), "solid"])
            .with_origin(ClipOrigin::Generated)
        })
        .collect()
}

/// Builds render jobs from a narration track and submits them.
pub struct ProjectPipeline {
    config: WorkerConfig,
    transcriber: Arc<dyn TranscriptionProvider>,
    clips: Arc<dyn ClipProvider>,
    queue: RenderingQueue,
    keywords: KeywordExtractor,
}

impl ProjectPipeline {
    pub fn new(
        config: WorkerConfig,
        transcriber: Arc<dyn TranscriptionProvider>,
        clips: Arc<dyn ClipProvider>,
        queue: RenderingQueue,
    ) -> Self {
        let keywords = KeywordExtractor::new(config.keyword_limit);
        Self {
            config,
            transcriber,
            clips,
            queue,
            keywords,
        }
    }

    pub fn queue(&self) -> &RenderingQueue {
        &self.queue
    }

    /// Transcribe, find background clips and queue the render.
    ///
    /// An empty or failed clip search falls back to [`default_clip_set`];
    /// transcription failures are retried and then reported.
    pub async fn submit_project(
        &self,
        request: ProjectRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> WorkerResult<JobHandle> {
        let theme = request.style.theme;
        let transcript = self.transcribe(&request.track).await?;

        let keywords = self.keywords.extract_with_theme(&transcript, theme);
        let clips = self.search_clips(&keywords, theme).await;
        info!(
            spans = transcript.len(),
            keywords = ?keywords,
            clips = clips.len(),
            "Prepared render inputs"
        );

        let job = RenderJob::new(
            request.track,
            transcript,
            clips,
            request.style,
            request.output_spec,
        );

        match self.queue.submit(job.clone(), Arc::clone(&sink)) {
            Ok(handle) => Ok(handle),
            Err(e) if e.is_no_clips() => {
                info!(job_id = %job.id, theme = %theme, "No stock clips, using generated defaults");
                let fallback = job.with_clips(default_clip_set(theme));
                Ok(self.queue.submit(fallback, sink)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn transcribe(&self, track: &AudioRef) -> WorkerResult<Vec<TranscriptSpan>> {
        let transcriber = &self.transcriber;
        let result = retry_async_when(
            &self.config.transcribe_retry(),
            |e: &ProviderError| e.is_retryable(),
            move || transcriber.transcribe(track),
        )
        .await;

        match result {
            RetryResult::Success(spans) => Ok(spans),
            RetryResult::Failed { error, attempts } => {
                Err(WorkerError::transcription_unavailable(attempts, error.to_string()))
            }
        }
    }

    /// Search errors and unusable clips are dropped, never fatal.
    async fn search_clips(&self, keywords: &[String], theme: Theme) -> Vec<BackgroundClip> {
        let found = match self.clips.search(keywords, theme).await {
            Ok(clips) => clips,
            Err(e) => {
                warn!("Clip search failed, continuing without stock clips: {}", e);
                return Vec::new();
            }
        };

        let total = found.len();
        let usable: Vec<BackgroundClip> = found.into_iter().filter(|c| c.check().is_ok()).collect();
        if usable.len() < total {
            warn!(dropped = total - usable.len(), "Ignoring invalid clips from search");
        }
        usable
    }
}
