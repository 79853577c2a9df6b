//! Application state.

use std::sync::Arc;

use tracing::info;

use vgen_render::{
    HttpRenderEngine, RateLimitedEngine, RenderEngine, RenderEngineConfig, RenderJobClient,
    RenderJobTracker, RenderResult,
};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub client: RenderJobClient,
    pub tracker: RenderJobTracker,
    /// Whether the engine credential was supplied at start-up
    pub engine_configured: bool,
}

impl AppState {
    /// Build state around the HTTP render engine.
    pub fn new(config: ApiConfig, engine_config: RenderEngineConfig) -> RenderResult<Self> {
        let engine_configured = engine_config.api_key.is_some();
        let callback_url = engine_config.callback_url.clone();
        let rate_limit = engine_config.rate_limit_rps;

        let http = HttpRenderEngine::new(engine_config)?;
        let engine: Arc<dyn RenderEngine> = match rate_limit {
            Some(rps) => {
                info!(rps = rps.get(), "Render engine rate limit enabled");
                Arc::new(RateLimitedEngine::new(http, rps))
            }
            None => Arc::new(http),
        };

        Ok(Self::with_engine(config, engine, callback_url, engine_configured))
    }

    /// Build state around any engine implementation.
    pub fn with_engine(
        config: ApiConfig,
        engine: Arc<dyn RenderEngine>,
        callback_url: Option<String>,
        engine_configured: bool,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: RenderJobClient::new(Arc::clone(&engine), callback_url),
            tracker: RenderJobTracker::new(engine),
            engine_configured,
        }
    }
}
