//! API error types.
//!
//! Every error renders as `{detail, code}`. Server-class errors also carry a
//! [`RedactedDetail`] extension so [`redact_server_errors`](crate::middleware::redact_server_errors)
//! can replace the detail when running in production.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use vgen_render::RenderError;
use vgen_timeline::TimelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Render submission failed: {message}")]
    RenderSubmission {
        status: Option<u16>,
        message: String,
    },

    #[error("Render status check failed: {message}")]
    RenderStatus {
        status: Option<u16>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::RenderSubmission { .. } | ApiError::RenderStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Configuration(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Configuration(_) => "configuration_error",
            ApiError::RenderSubmission { .. } => "render_submission_failed",
            ApiError::RenderStatus { .. } => "render_status_failed",
            ApiError::NotFound(_) => "not_found",
            ApiError::RateLimited => "rate_limited",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Detail shown in production instead of the real message.
    fn generic_detail(&self) -> Option<&'static str> {
        match self {
            ApiError::Configuration(_) => Some("The render service is not configured"),
            ApiError::RenderSubmission { .. } => Some("The render service rejected the request"),
            ApiError::RenderStatus { .. } => Some("The render service could not report status"),
            ApiError::Internal(_) => Some("An internal error occurred"),
            _ => None,
        }
    }
}

impl From<TimelineError> for ApiError {
    fn from(err: TimelineError) -> Self {
        ApiError::Validation(err.message().to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Configuration(msg) => ApiError::Configuration(msg),
            RenderError::Submission { status, message } => {
                ApiError::RenderSubmission { status, message }
            }
            RenderError::JobNotFound(id) => ApiError::not_found(format!("render job {}", id)),
            RenderError::Status { status, message } => ApiError::RenderStatus { status, message },
            err @ RenderError::PollTimeout { .. } => ApiError::RenderStatus {
                status: None,
                message: err.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Response extension marking a detail that must not leak in production.
#[derive(Debug, Clone, Copy)]
pub struct RedactedDetail {
    pub detail: &'static str,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let ApiError::Internal(msg) = &self {
            error!(error = %msg, "Internal error");
        }

        let redacted = self.generic_detail().map(|detail| RedactedDetail {
            detail,
            code: self.code(),
        });

        let body = ErrorResponse {
            detail: self.to_string(),
            code: Some(self.code().to_string()),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(redacted) = redacted {
            response.extensions_mut().insert(redacted);
        }
        response
    }
}
