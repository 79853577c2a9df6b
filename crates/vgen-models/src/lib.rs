//! Shared data models for the VideoGen backend.
//!
//! This crate provides Serde-serializable types for:
//! - Caller-facing render requests (single title, scenes, intro/outro)
//! - Normalized scenes and the compiled multi-track timeline
//! - Output specification tokens (aspect ratio, resolution, format)
//! - Render job identifiers and status

pub mod job;
pub mod output;
pub mod request;
pub mod scene;
pub mod style;
pub mod time;
pub mod timeline;

// Re-export common types
pub use job::{JobId, RenderJob, RenderStatus};
pub use output::{Format, OutputSpec, Quality, ResolutionTier, Size};
pub use request::{
    IntroOutroKind, IntroOutroRequest, SceneInput, ScenesRequest, SingleTitleRequest, VideoRequest,
};
pub use scene::Scene;
pub use style::{AspectRatio, Effect, Fit, Position, TextStyle, Transition};
pub use time::Millis;
pub use timeline::{
    Asset, Clip, ClipTransition, Soundtrack, SoundtrackEffect, Timeline, Track, TrackKind,
};
