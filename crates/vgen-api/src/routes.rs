//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    get_render_status, health, preview_render, ready, request_schema, submit_intro_outro,
    submit_scenes, submit_title,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, panic_response, rate_limit_middleware, redact_server_errors, request_id,
    request_logging, security_headers, RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let render_routes = Router::new()
        .route("/render/title", post(submit_title))
        .route("/render/scenes", post(submit_scenes))
        .route("/render/intro-outro", post(submit_intro_outro))
        // Dry run: compiled timeline without submission
        .route("/render/preview", post(preview_render))
        .route("/render/schema", get(request_schema))
        .route("/render/:job_id", get(get_render_status));

    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = render_routes.layer(middleware::from_fn_with_state(
        rate_limiter,
        rate_limit_middleware,
    ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = match metrics_handle {
        Some(handle) if state.config.metrics_enabled => {
            Router::new().route("/metrics", get(move || async move { handle.render() }))
        }
        _ => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            redact_server_errors,
        ))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
