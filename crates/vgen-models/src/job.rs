//! Render job identifiers and status.
//!
//! The render engine owns every job. These types are snapshots of what the
//! engine reported; nothing here is persisted locally.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque job identifier assigned by the render engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render job status.
///
/// `Queued -> Rendering -> Done`, and any non-terminal state may move to
/// `Failed`. There is no cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    /// Accepted by the engine, not started
    #[default]
    Queued,
    /// Engine is fetching assets, rendering or saving
    Rendering,
    /// Output is available
    Done,
    /// Engine reported an error
    Failed,
}

impl RenderStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Queued => "queued",
            RenderStatus::Rendering => "rendering",
            RenderStatus::Done => "done",
            RenderStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderStatus::Done | RenderStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Staying in the same state is always allowed, which keeps repeated
    /// polls of a terminal job valid.
    pub fn can_transition_to(&self, next: RenderStatus) -> bool {
        use RenderStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Queued, Rendering) | (Queued, Failed) => true,
            (Rendering, Done) | (Rendering, Failed) => true,
            _ => false,
        }
    }

    /// Whether `self` can be reached from `prev` in zero or more steps.
    ///
    /// Two polls may straddle several transitions, so a poll observing
    /// `Queued` and the next observing `Done` is consistent.
    pub fn is_reachable_from(&self, prev: RenderStatus) -> bool {
        let via_rendering = prev.can_transition_to(RenderStatus::Rendering)
            && RenderStatus::Rendering.can_transition_to(*self);
        prev.can_transition_to(*self) || via_rendering
    }

    /// Map an engine status string onto the local state machine.
    ///
    /// The engine reports several intermediate stages which all count as
    /// `Rendering`. Unknown strings return `None`.
    pub fn from_engine(status: &str) -> Option<Self> {
        match status.trim().to_lowercase().as_str() {
            "queued" => Some(RenderStatus::Queued),
            "fetching" | "preprocessing" | "rendering" | "saving" => Some(RenderStatus::Rendering),
            "done" => Some(RenderStatus::Done),
            "failed" => Some(RenderStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a render job as reported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderJob {
    pub id: JobId,
    pub status: RenderStatus,
    /// Rendered file, present once done
    pub url: Option<String>,
    pub poster: Option<String>,
    pub thumbnail: Option<String>,
    /// Engine error message, present once failed
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RenderJob {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
