//! Caller-facing render requests.
//!
//! Every field a caller may omit is optional here; defaults are applied
//! during normalization, not during deserialization, so that a missing
//! required field surfaces as a validation error rather than a parse error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::style::{Effect, Position, TextStyle, Transition};

/// One scene as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub text_style: Option<TextStyle>,
    pub title_position: Option<Position>,
    pub effect: Option<Effect>,
    /// Overrides the request-wide transition for this scene's entry
    pub transition_in: Option<Transition>,
    /// Overrides the request-wide transition for this scene's exit
    pub transition_out: Option<Transition>,
}

/// A single title card over a background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleTitleRequest {
    /// Required
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub voice_ref: Option<String>,
    pub music_ref: Option<String>,
    pub music_volume: Option<f64>,
    pub voice_volume: Option<f64>,
    /// Seconds, default 15
    pub duration: Option<f64>,
    pub aspect_ratio: Option<String>,
    pub format: Option<String>,
    pub resolution: Option<String>,
    pub quality: Option<String>,
    pub text_style: Option<TextStyle>,
    pub title_position: Option<Position>,
    pub effect: Option<Effect>,
}

/// An ordered sequence of scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenesRequest {
    /// Required, non-empty
    #[serde(default)]
    pub scenes: Vec<SceneInput>,
    pub music_ref: Option<String>,
    pub voice_ref: Option<String>,
    pub music_volume: Option<f64>,
    pub voice_volume: Option<f64>,
    pub aspect_ratio: Option<String>,
    pub format: Option<String>,
    pub resolution: Option<String>,
    pub quality: Option<String>,
    /// Transition between interior scenes, default `fade`
    pub transition_type: Option<Transition>,
}

/// Intro or outro card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntroOutroKind {
    #[default]
    Intro,
    Outro,
}

impl IntroOutroKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntroOutroKind::Intro => "intro",
            IntroOutroKind::Outro => "outro",
        }
    }
}

impl fmt::Display for IntroOutroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel intro or outro card with optional logo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntroOutroRequest {
    pub kind: IntroOutroKind,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Used as the title when `title` is absent
    pub channel_name: Option<String>,
    /// Used as the subtitle when `subtitle` is absent
    pub tagline: Option<String>,
    pub logo_ref: Option<String>,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub music_ref: Option<String>,
    pub voice_ref: Option<String>,
    pub music_volume: Option<f64>,
    pub voice_volume: Option<f64>,
    /// Seconds, default 5
    pub duration: Option<f64>,
    /// Seconds, default 0.5
    pub fade_in: Option<f64>,
    /// Seconds, default 1.0
    pub fade_out: Option<f64>,
    pub aspect_ratio: Option<String>,
    pub format: Option<String>,
    pub resolution: Option<String>,
    pub quality: Option<String>,
    pub text_style: Option<TextStyle>,
    pub effect: Option<Effect>,
    pub transition: Option<Transition>,
}

/// Any of the three request shapes, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VideoRequest {
    SingleTitle(SingleTitleRequest),
    Scenes(ScenesRequest),
    IntroOutro(IntroOutroRequest),
}

impl VideoRequest {
    /// Short label used in logs and metrics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            VideoRequest::SingleTitle(_) => "single_title",
            VideoRequest::Scenes(_) => "scenes",
            VideoRequest::IntroOutro(r) => match r.kind {
                IntroOutroKind::Intro => "intro",
                IntroOutroKind::Outro => "outro",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_request_parse() {
        let json = r#"{
            "type": "scenes",
            "scenes": [{"title": "One", "duration": 5}, {"duration": 2.5}],
            "transitionType": "wipeLeft"
        }"#;
        let request: VideoRequest = serde_json::from_str(json).unwrap();
        match request {
            VideoRequest::Scenes(r) => {
                assert_eq!(r.scenes.len(), 2);
                assert_eq!(r.scenes[1].duration, Some(2.5));
                assert_eq!(r.transition_type, Some(Transition::WipeLeft));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_missing_title_still_parses() {
        let request: SingleTitleRequest = serde_json::from_str(r#"{"duration": 10}"#).unwrap();
        assert!(request.title.is_none());
    }

    #[test]
    fn test_intro_outro_kind_label() {
        let request: VideoRequest =
            serde_json::from_str(r#"{"type": "introOutro", "kind": "outro"}"#).unwrap();
        assert_eq!(request.kind_label(), "outro");
    }
}
