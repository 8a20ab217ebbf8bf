//! Single-slot rendering queue.
//!
//! This crate provides:
//! - FIFO job submission with synchronous input validation
//! - A single worker that runs the fixed render stage sequence
//! - Monotonic per-job progress delivered to a caller-supplied sink
//! - Cancellation of jobs that have not started yet

pub mod compositor;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod queue;
mod stages;

pub use compositor::{CompositionRequest, Compositor};
pub use config::QueueConfig;
pub use error::{CompositorError, JobFailure, QueueError, QueueResult};
pub use job::{JobHandle, JobOutcome, QueueStatus};
pub use logging::JobLogger;
pub use progress::{progress_channel, ChannelSink, NoopSink, ProgressSink, ProgressTracker};
pub use queue::RenderingQueue;
