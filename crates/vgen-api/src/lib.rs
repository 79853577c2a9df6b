//! Axum HTTP API server.
//!
//! This crate provides:
//! - Title, scenes and intro/outro render submission
//! - Dry-run compilation and request schema
//! - Render job status passthrough
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
