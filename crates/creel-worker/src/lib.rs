//! Caller-side orchestration for CaptionReel.
//!
//! Turns a narration track and a style into a queued render job:
//! transcription, keyword extraction, background clip search, and a
//! fallback to generated clips when the search comes back empty.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod retry;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::{init_tracing, LogFormat};
pub use pipeline::{default_clip_set, ProjectPipeline, ProjectRequest};
pub use providers::{ClipProvider, ProviderError, TranscriptionProvider};
pub use retry::{retry_async, retry_async_when, RetryConfig, RetryResult};
