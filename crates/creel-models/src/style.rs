//! Text style, theme and animation definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{describe_validation, ModelError, ModelResult};

/// Highlight colour used by karaoke animation when the style does not set one.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFD700";

/// Visual theme. Drives clip search and transition defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Nature,
    City,
    Abstract,
    Minimal,
    Colorful,
    /// Any theme this build does not know about
    #[serde(other)]
    Other,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[
        Theme::Nature,
        Theme::City,
        Theme::Abstract,
        Theme::Minimal,
        Theme::Colorful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Nature => "nature",
            Theme::City => "city",
            Theme::Abstract => "abstract",
            Theme::Minimal => "minimal",
            Theme::Colorful => "colorful",
            Theme::Other => "other",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = std::convert::Infallible;

    /// Unknown names map to [`Theme::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "nature" => Theme::Nature,
            "city" => Theme::City,
            "abstract" => Theme::Abstract,
            "minimal" => Theme::Minimal,
            "colorful" | "colourful" => Theme::Colorful,
            _ => Theme::Other,
        })
    }
}

/// Per-span text animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    #[default]
    Fade,
    Karaoke,
    Bounce,
    Slide,
    /// Missing or unrecognised; scheduled as fade
    #[serde(other)]
    Unspecified,
}

impl AnimationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Fade => "fade",
            AnimationType::Karaoke => "karaoke",
            AnimationType::Bounce => "bounce",
            AnimationType::Slide => "slide",
            AnimationType::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnimationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "fade" => AnimationType::Fade,
            "karaoke" => AnimationType::Karaoke,
            "bounce" => AnimationType::Bounce,
            "slide" => AnimationType::Slide,
            _ => AnimationType::Unspecified,
        })
    }
}

/// Vertical placement of the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    Top,
    Center,
    #[default]
    Bottom,
    /// Missing or unrecognised; laid out like bottom
    #[serde(other)]
    Unspecified,
}

impl TextPosition {
    /// Vertical anchor as a fraction of canvas height, measured from the top.
    pub fn vertical_fraction(&self) -> f64 {
        match self {
            TextPosition::Top => 0.10,
            TextPosition::Center => 0.50,
            TextPosition::Bottom | TextPosition::Unspecified => 0.85,
        }
    }
}

impl FromStr for TextPosition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "top" => TextPosition::Top,
            "center" | "middle" => TextPosition::Center,
            "bottom" => TextPosition::Bottom,
            _ => TextPosition::Unspecified,
        })
    }
}

/// Caption styling for one render job. Immutable once the job is queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct StyleConfig {
    #[validate(length(min = 1))]
    pub font_family: String,
    #[validate(range(exclusive_min = 0.0))]
    pub font_size: f64,
    #[validate(length(min = 1))]
    pub font_color: String,
    #[validate(length(min = 1))]
    pub background_color: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub animation_type: AnimationType,
    #[serde(default)]
    pub text_position: TextPosition,
    /// Karaoke highlight colour; falls back to [`DEFAULT_HIGHLIGHT_COLOR`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 48.0,
            font_color: "#FFFFFF".to_string(),
            background_color: "#000000".to_string(),
            theme: Theme::default(),
            animation_type: AnimationType::default(),
            text_position: TextPosition::default(),
            highlight_color: None,
        }
    }
}

impl StyleConfig {
    /// Set theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set animation type.
    pub fn with_animation(mut self, animation_type: AnimationType) -> Self {
        self.animation_type = animation_type;
        self
    }

    /// Set text position.
    pub fn with_position(mut self, text_position: TextPosition) -> Self {
        self.text_position = text_position;
        self
    }

    /// Set font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Colour the karaoke highlight moves to.
    pub fn highlight_color(&self) -> &str {
        self.highlight_color
            .as_deref()
            .unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
    }

    /// Check field rules and report them as an input error.
    pub fn check(&self) -> ModelResult<()> {
        if !self.font_size.is_finite() {
            return Err(ModelError::invalid_style("font_size must be finite"));
        }
        self.validate()
            .map_err(|e| ModelError::invalid_style(describe_validation(&e)))
    }
}
