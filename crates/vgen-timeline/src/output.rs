//! Caller tokens to a concrete output spec.
//!
//! Resolution is total: an unrecognized or missing token falls back to a safe
//! default instead of failing the request.

use tracing::debug;

use vgen_models::{AspectRatio, Format, OutputSpec, Quality, ResolutionTier, Size};

/// Frame rate of every render.
pub const DEFAULT_FPS: u32 = 30;

/// Raw output tokens as the caller sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTokens {
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

/// Maps output tokens onto an [`OutputSpec`].
pub struct OutputResolver;

impl OutputResolver {
    pub fn resolve(tokens: &OutputTokens) -> OutputSpec {
        let aspect_ratio = tokens
            .aspect_ratio
            .as_deref()
            .map(resolve_aspect_ratio)
            .unwrap_or_default();

        OutputSpec {
            format: tokens.format.as_deref().map(resolve_format).unwrap_or_default(),
            resolution: tokens
                .resolution
                .as_deref()
                .map(resolve_resolution)
                .unwrap_or_default(),
            aspect_ratio,
            size: pixel_size(aspect_ratio),
            fps: DEFAULT_FPS,
            quality: tokens.quality.as_deref().map(resolve_quality).unwrap_or_default(),
        }
    }
}

/// `sd/480/720 -> sd`, `hd/1080/full-hd -> hd`, `4k/2160/uhd -> 4k`,
/// anything else `hd`.
pub fn resolve_resolution(token: &str) -> ResolutionTier {
    match token.trim().to_lowercase().as_str() {
        "sd" | "480" | "480p" | "720" | "720p" => ResolutionTier::Sd,
        "hd" | "1080" | "1080p" | "full-hd" | "fullhd" | "fhd" => ResolutionTier::Hd,
        "4k" | "2160" | "2160p" | "uhd" => ResolutionTier::Uhd,
        other => {
            debug!(token = %other, "Unrecognized resolution, using hd");
            ResolutionTier::Hd
        }
    }
}

/// Supported ratios resolve to themselves; anything else is 16:9.
pub fn resolve_aspect_ratio(token: &str) -> AspectRatio {
    match token.parse::<AspectRatio>() {
        Ok(ratio) if ratio.pixel_size().is_some() => ratio,
        _ => {
            debug!(token = %token, "Unsupported aspect ratio, using 16:9");
            AspectRatio::LANDSCAPE
        }
    }
}

/// Pixel dimensions for an aspect ratio token.
pub fn resolve_dimensions(token: &str) -> Size {
    pixel_size(resolve_aspect_ratio(token))
}

pub fn resolve_format(token: &str) -> Format {
    match token.trim().to_lowercase().as_str() {
        "mp4" => Format::Mp4,
        "gif" => Format::Gif,
        "webm" => Format::Webm,
        other => {
            debug!(token = %other, "Unrecognized format, using mp4");
            Format::Mp4
        }
    }
}

pub fn resolve_quality(token: &str) -> Quality {
    match token.trim().to_lowercase().as_str() {
        "low" => Quality::Low,
        "medium" => Quality::Medium,
        _ => Quality::High,
    }
}

fn pixel_size(ratio: AspectRatio) -> Size {
    ratio
        .pixel_size()
        .unwrap_or(Size::new(1920, 1080))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_tokens() {
        for token in ["sd", "480", "720", " SD "] {
            assert_eq!(resolve_resolution(token), ResolutionTier::Sd, "{}", token);
        }
        for token in ["hd", "1080", "full-hd", "HD"] {
            assert_eq!(resolve_resolution(token), ResolutionTier::Hd, "{}", token);
        }
        for token in ["4k", "2160", "uhd", "4K"] {
            assert_eq!(resolve_resolution(token), ResolutionTier::Uhd, "{}", token);
        }
        assert_eq!(resolve_resolution("unknown"), ResolutionTier::Hd);
        assert_eq!(resolve_resolution(""), ResolutionTier::Hd);
    }

    #[test]
    fn test_aspect_ratio_dimensions() {
        assert_eq!(resolve_dimensions("16:9"), Size::new(1920, 1080));
        assert_eq!(resolve_dimensions("9:16"), Size::new(1080, 1920));
        assert_eq!(resolve_dimensions("1:1"), Size::new(1080, 1080));
        assert_eq!(resolve_dimensions("4:5"), Size::new(1080, 1350));
        assert_eq!(resolve_dimensions("21:9"), Size::new(1920, 1080));
        assert_eq!(resolve_aspect_ratio("banana"), AspectRatio::LANDSCAPE);
    }

    #[test]
    fn test_resolve_never_fails() {
        let tokens = ["", "  ", "16:9", "9:16", "0:0", "::", "1080", "4k", "\u{1F3AC}", "-1:5"];
        for aspect in tokens {
            for resolution in tokens {
                let spec = OutputResolver::resolve(&OutputTokens {
                    aspect_ratio: Some(aspect.to_string()),
                    resolution: Some(resolution.to_string()),
                    ..Default::default()
                });
                assert_eq!(spec.fps, DEFAULT_FPS);
                assert_eq!(spec.quality, Quality::High);
                assert_eq!(Some(spec.size), spec.aspect_ratio.pixel_size());
            }
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let spec = OutputResolver::resolve(&OutputTokens::default());
        assert_eq!(spec.format, Format::Mp4);
        assert_eq!(spec.resolution, ResolutionTier::Hd);
        assert_eq!(spec.aspect_ratio, AspectRatio::LANDSCAPE);
        assert_eq!(spec.size, Size::new(1920, 1080));
    }

    #[test]
    fn test_quality_override() {
        let spec = OutputResolver::resolve(&OutputTokens {
            quality: Some("medium".to_string()),
            format: Some("gif".to_string()),
            ..Default::default()
        });
        assert_eq!(spec.quality, Quality::Medium);
        assert_eq!(spec.format, Format::Gif);
    }
}
