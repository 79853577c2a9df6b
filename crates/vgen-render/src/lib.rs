//! Render engine boundary.
//!
//! Submits compiled timelines to the external render engine and tracks the
//! resulting jobs. The engine owns every job; nothing here stores job state.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod http;
pub mod limit;
pub mod metrics;
pub mod tracker;
pub mod types;

pub use client::RenderJobClient;
pub use config::{PollBackoffConfig, RenderEngineConfig};
pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeRenderEngine;
pub use http::HttpRenderEngine;
pub use limit::RateLimitedEngine;
pub use tracker::RenderJobTracker;
pub use types::{RenderSubmission, SubmittedJob};
