//! Composition planning for CaptionReel.
//!
//! This crate provides the pure, synchronous half of a render job:
//! - Segment tiling and cyclic clip assignment
//! - Theme-driven transition policy
//! - Keyword extraction for clip search
//! - Per-span caption animation and text layout
//! - Background layer preparation for the compositor
//!
//! Nothing here blocks or performs I/O.

pub mod animation;
pub mod config;
pub mod error;
pub mod keywords;
pub mod layers;
pub mod layout;
pub mod timeline;
pub mod transitions;

pub use animation::{AnimationScheduler, AnimationSpec, KeyframeGenerator};
pub use config::ComposeConfig;
pub use error::{ComposeError, ComposeResult};
pub use keywords::KeywordExtractor;
pub use layers::{prepare_layers, BackgroundLayer};
pub use layout::layout;
pub use timeline::TimelineBuilder;
pub use transitions::{transition_for, transition_duration, SegmentTransitions};
