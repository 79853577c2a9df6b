//! Visual style tokens: aspect ratio, transitions, effects, text styles.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::output::Size;

/// Clip transition applied on entry or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    #[default]
    Fade,
    FadeSlow,
    FadeFast,
    Reveal,
    WipeLeft,
    WipeRight,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Zoom,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Fade => "fade",
            Transition::FadeSlow => "fadeSlow",
            Transition::FadeFast => "fadeFast",
            Transition::Reveal => "reveal",
            Transition::WipeLeft => "wipeLeft",
            Transition::WipeRight => "wipeRight",
            Transition::SlideLeft => "slideLeft",
            Transition::SlideRight => "slideRight",
            Transition::SlideUp => "slideUp",
            Transition::SlideDown => "slideDown",
            Transition::Zoom => "zoom",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Motion effect applied to a clip for its whole length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    ZoomIn,
    ZoomOut,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
}

/// Preset text treatment for title assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum TextStyle {
    #[default]
    Minimal,
    Blockbuster,
    Vogue,
    Sketchy,
    Skinny,
    Chunk,
    ChunkLight,
    Marker,
    Future,
    Subtitle,
}

/// Anchor position of a clip within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
    #[default]
    Center,
}

/// How an image asset is fitted to the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    #[default]
    Cover,
    Contain,
    Crop,
    None,
}

/// Aspect ratio specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Standard widescreen (16:9)
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Standard portrait (9:16) for TikTok/Reels
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Instagram portrait (4:5)
    pub const INSTAGRAM_PORTRAIT: AspectRatio = AspectRatio {
        width: 4,
        height: 5,
    };

    /// Ratios the render pipeline has a pixel size for.
    pub const SUPPORTED: &'static [AspectRatio] = &[
        AspectRatio::LANDSCAPE,
        AspectRatio::PORTRAIT,
        AspectRatio::SQUARE,
        AspectRatio::INSTAGRAM_PORTRAIT,
    ];

    /// Create a new aspect ratio.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Output frame size for a supported ratio.
    pub fn pixel_size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (16, 9) => Some(Size::new(1920, 1080)),
            (9, 16) => Some(Size::new(1080, 1920)),
            (1, 1) => Some(Size::new(1080, 1080)),
            (4, 5) => Some(Size::new(1080, 1350)),
            _ => None,
        }
    }

    /// Returns the aspect ratio as a decimal.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 {
            return Err(AspectRatioParseError::InvalidFormat(s.to_string()));
        }

        let width = parts[0]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[0].to_string()))?;
        let height = parts[1]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[1].to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AspectRatioParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::LANDSCAPE
    }
}

impl JsonSchema for AspectRatio {
    fn schema_name() -> String {
        "AspectRatio".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H'")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!(
            "9:16".parse::<AspectRatio>().unwrap(),
            AspectRatio::PORTRAIT
        );
        assert_eq!(" 16 : 9 ".parse::<AspectRatio>().unwrap(), AspectRatio::LANDSCAPE);
        assert_eq!("1:1".parse::<AspectRatio>().unwrap(), AspectRatio::SQUARE);
        assert!("invalid".parse::<AspectRatio>().is_err());
        assert!("0:16".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_pixel_sizes() {
        assert_eq!(AspectRatio::PORTRAIT.pixel_size(), Some(Size::new(1080, 1920)));
        assert_eq!(
            AspectRatio::INSTAGRAM_PORTRAIT.pixel_size(),
            Some(Size::new(1080, 1350))
        );
        assert_eq!(AspectRatio::new(21, 9).pixel_size(), None);
        for ratio in AspectRatio::SUPPORTED {
            assert!(ratio.pixel_size().is_some(), "{} has no size", ratio);
        }
    }

    #[test]
    fn test_aspect_ratio_serde_as_string() {
        let json = serde_json::to_string(&AspectRatio::INSTAGRAM_PORTRAIT).unwrap();
        assert_eq!(json, "\"4:5\"");
        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::PORTRAIT);
    }

    #[test]
    fn test_transition_tokens() {
        let t: Transition = serde_json::from_str("\"wipeLeft\"").unwrap();
        assert_eq!(t, Transition::WipeLeft);
        assert_eq!(t.to_string(), "wipeLeft");
        assert_eq!(
            serde_json::to_string(&TextStyle::ChunkLight).unwrap(),
            "\"chunkLight\""
        );
    }
}
