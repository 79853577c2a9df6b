//! Timeline compilation.
//!
//! Turns one of the three request shapes into a time-indexed multi-track
//! timeline and a concrete output spec:
//!
//! - [`normalize`]: validate caller input and fill defaults
//! - [`compiler`]: lay scenes out as absolute, non-overlapping clips
//! - [`composer`]: layer voice-over and background music on top
//! - [`output`]: map aspect ratio / resolution / format tokens
//! - [`plan`]: run the whole pipeline
//!
//! Everything here is synchronous and deterministic; nothing touches the
//! network.

pub mod compiler;
pub mod composer;
pub mod error;
pub mod normalize;
pub mod output;
pub mod plan;

pub use compiler::{Inset, InsetProfile, TimelineCompiler};
pub use composer::{AudioLayer, AudioPlan, TrackComposer};
pub use error::{TimelineError, TimelineResult};
pub use normalize::{Normalize, NormalizedVideo, VideoKind};
pub use output::{OutputResolver, OutputTokens};
pub use plan::{plan_render, RenderPlan};
