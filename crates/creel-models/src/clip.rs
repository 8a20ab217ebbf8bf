//! Background clip models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{describe_validation, ModelError, ModelResult};

/// Where a background clip came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipOrigin {
    /// Licensed stock footage returned by the clip provider
    #[default]
    Stock,
    /// Synthesised locally (solid colours, gradients)
    Generated,
}

/// A candidate background clip. Read-only to the composition core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct BackgroundClip {
    #[validate(length(min = 1))]
    pub id: String,
    /// Opaque reference understood by the compositor (URL, storage key)
    #[validate(length(min = 1))]
    pub source_ref: String,
    #[validate(range(exclusive_min = 0.0))]
    pub duration_seconds: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_ref: Option<String>,
    #[serde(default)]
    pub origin: ClipOrigin,
}

impl BackgroundClip {
    /// Create a stock clip.
    pub fn new(id: impl Into<String>, source_ref: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            id: id.into(),
            source_ref: source_ref.into(),
            duration_seconds,
            keywords: Vec::new(),
            thumbnail_ref: None,
            origin: ClipOrigin::Stock,
        }
    }

    /// Set keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set thumbnail reference.
    pub fn with_thumbnail(mut self, thumbnail_ref: impl Into<String>) -> Self {
        self.thumbnail_ref = Some(thumbnail_ref.into());
        self
    }

    /// Set origin.
    pub fn with_origin(mut self, origin: ClipOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn check(&self) -> ModelResult<()> {
        if !self.duration_seconds.is_finite() {
            return Err(ModelError::invalid_clip(&self.id, "duration must be finite"));
        }
        self.validate()
            .map_err(|e| ModelError::invalid_clip(&self.id, describe_validation(&e)))
    }
}
