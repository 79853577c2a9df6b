//! Compiled multi-track timeline, as submitted to the render engine.
//!
//! Tracks are ordered top-most first. Clip windows are absolute offsets from
//! the start of the timeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::style::{Effect, Fit, Position, TextStyle, Transition};
use crate::time::Millis;

/// What a clip displays or plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Asset {
    /// Remote image.
    Image { src: String },
    /// Solid colour fill.
    Color { color: String },
    /// Styled text.
    Title {
        text: String,
        style: TextStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        position: Position,
    },
    /// Remote audio file.
    Audio { src: String, volume: f64 },
}

impl Asset {
    pub fn is_audio(&self) -> bool {
        matches!(self, Asset::Audio { .. })
    }
}

/// Entry and exit transitions of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ClipTransition {
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub incoming: Option<Transition>,
    #[serde(rename = "out", skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<Transition>,
}

impl ClipTransition {
    pub fn new(incoming: Transition, outgoing: Transition) -> Self {
        Self {
            incoming: Some(incoming),
            outgoing: Some(outgoing),
        }
    }
}

/// A single timed element on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    pub asset: Asset,
    /// Absolute start offset
    pub start: Millis,
    /// Visible/audible span, always > 0
    pub length: Millis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<ClipTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl Clip {
    /// A bare clip with only its asset and window set.
    pub fn new(asset: Asset, start: Millis, length: Millis) -> Self {
        Self {
            asset,
            start,
            length,
            fit: None,
            effect: None,
            transition: None,
            position: None,
            scale: None,
        }
    }

    /// Exclusive end of the clip window.
    pub fn end(&self) -> Millis {
        self.start + self.length
    }
}

/// Layer a track belongs to. Local bookkeeping only; never sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Title,
    Subtitle,
    Overlay,
    #[default]
    Background,
    Voice,
}

/// Ordered, non-overlapping clips of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Track {
    #[serde(skip)]
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            clips: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// End of the last clip, or zero for an empty track.
    pub fn end(&self) -> Millis {
        self.clips.iter().map(Clip::end).max().unwrap_or(Millis::ZERO)
    }

    /// True when every clip starts at or after the end of the previous one.
    pub fn is_non_overlapping(&self) -> bool {
        self.clips
            .windows(2)
            .all(|pair| pair[1].start >= pair[0].end())
    }
}

/// Fade envelope of the background music.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SoundtrackEffect {
    FadeIn,
    FadeOut,
    FadeInFadeOut,
}

/// Background music spanning the whole timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Soundtrack {
    pub src: String,
    pub volume: f64,
    pub effect: SoundtrackEffect,
}

/// Complete compiled structure submitted to the render engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timeline {
    /// Colour behind every track
    pub background: String,
    pub tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundtrack: Option<Soundtrack>,
    /// Total duration; computed locally, the engine derives its own
    #[serde(skip)]
    pub duration: Millis,
}

impl Timeline {
    /// First track of the given kind.
    pub fn track(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// Iterate over every clip on every track.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }
}
