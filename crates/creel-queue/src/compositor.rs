//! The external compositor seam.
//!
//! The queue computes everything up to the merge stage itself; pixels are the
//! compositor's business.

use async_trait::async_trait;

use creel_compose::BackgroundLayer;
use creel_models::{AudioRef, JobId, OutputRef, OutputSpec, SpanAnimation, TextLayout, Timeline};

use crate::error::CompositorError;

/// Everything the compositor needs to merge one job.
#[derive(Debug, Clone, Copy)]
pub struct CompositionRequest<'a> {
    pub job_id: &'a JobId,
    pub audio: &'a AudioRef,
    pub timeline: &'a Timeline,
    pub layers: &'a [BackgroundLayer],
    pub animations: &'a [SpanAnimation],
    pub layout: &'a TextLayout,
    pub output: &'a OutputSpec,
}

/// Video compositor.
///
/// Only `composite` is required; the transition and export passes default to
/// returning the merged output unchanged for compositors that do everything
/// in one call.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Merge background layers, captions and audio into one video.
    async fn composite(&self, request: CompositionRequest<'_>) -> Result<OutputRef, CompositorError>;

    /// Apply segment transitions to a merged video.
    async fn apply_transitions(
        &self,
        merged: &OutputRef,
        _layers: &[BackgroundLayer],
    ) -> Result<OutputRef, CompositorError> {
        Ok(merged.clone())
    }

    /// Encode the final file.
    async fn export(&self, rendered: &OutputRef, _spec: &OutputSpec) -> Result<OutputRef, CompositorError> {
        Ok(rendered.clone())
    }
}
