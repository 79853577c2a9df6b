//! Render engine error types.

use thiserror::Error;
use vgen_models::JobId;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render engine not configured: {0}")]
    Configuration(String),

    #[error("Render submission failed: {message}")]
    Submission {
        /// Upstream HTTP status, absent for transport failures
        status: Option<u16>,
        message: String,
    },

    #[error("Render job not found: {0}")]
    JobNotFound(JobId),

    #[error("Render status check failed: {message}")]
    Status { status: Option<u16>, message: String },

    #[error("Render job {job_id} still running after {attempts} polls")]
    PollTimeout { job_id: JobId, attempts: u32 },
}

impl RenderError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn submission(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Submission {
            status,
            message: msg.into(),
        }
    }

    pub fn status(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: msg.into(),
        }
    }

    /// HTTP status reported by the engine, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RenderError::Submission { status, .. } | RenderError::Status { status, .. } => *status,
            RenderError::JobNotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Transient failures a caller may retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RenderError::Submission { status, .. } | RenderError::Status { status, .. } => {
                match status {
                    None => true,
                    Some(code) => *code == 429 || *code >= 500,
                }
            }
            RenderError::PollTimeout { .. } => true,
            RenderError::Configuration(_) | RenderError::JobNotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RenderError::submission(None, "connection reset").is_retryable());
        assert!(RenderError::status(Some(503), "unavailable").is_retryable());
        assert!(RenderError::submission(Some(429), "slow down").is_retryable());
        assert!(!RenderError::submission(Some(400), "bad timeline").is_retryable());
        assert!(!RenderError::configuration("missing key").is_retryable());
        assert!(!RenderError::JobNotFound(JobId::from_string("abc")).is_retryable());
    }

    #[test]
    fn test_upstream_status() {
        assert_eq!(
            RenderError::submission(Some(422), "invalid").upstream_status(),
            Some(422)
        );
        assert_eq!(
            RenderError::JobNotFound(JobId::from_string("x")).upstream_status(),
            Some(404)
        );
        assert_eq!(RenderError::configuration("x").upstream_status(), None);
    }

    #[test]
    fn test_display_keeps_upstream_message() {
        let err = RenderError::submission(Some(400), "Invalid clip length");
        assert_eq!(err.to_string(), "Render submission failed: Invalid clip length");
    }
}
