//! Compilation error types.

use thiserror::Error;

/// Result type for compilation.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors raised before anything is sent to the render engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// Bad or missing caller input; the caller can fix the request.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl TimelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The caller-facing message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            TimelineError::Validation(msg) => msg,
        }
    }
}
