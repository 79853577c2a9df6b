//! Render engine and polling configuration.

use std::num::NonZeroU32;
use std::time::Duration;

/// Connection settings for the external render engine.
///
/// Built once at start-up and passed to [`HttpRenderEngine::new`](crate::HttpRenderEngine::new).
#[derive(Debug, Clone)]
pub struct RenderEngineConfig {
    /// Base URL of the engine API, without trailing slash
    pub base_url: String,
    /// Static credential. Absence is reported per request, not at start-up.
    pub api_key: Option<String>,
    /// Webhook the engine calls when a job finishes
    pub callback_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Client-side request ceiling, unlimited when `None`
    pub rate_limit_rps: Option<NonZeroU32>,
}

impl Default for RenderEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            api_key: None,
            callback_url: None,
            timeout: Duration::from_secs(10),
            rate_limit_rps: None,
        }
    }
}

impl RenderEngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: std::env::var("RENDER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: non_empty_var("RENDER_API_KEY"),
            callback_url: non_empty_var("RENDER_CALLBACK_URL"),
            timeout: std::env::var("RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            rate_limit_rps: std::env::var("RENDER_RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .and_then(NonZeroU32::new),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Backoff schedule for [`RenderJobTracker::wait_for_terminal`](crate::RenderJobTracker::wait_for_terminal).
#[derive(Debug, Clone)]
pub struct PollBackoffConfig {
    /// Delay before the second poll (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay cap (in milliseconds).
    pub max_delay_ms: u64,
    /// Polls before giving up.
    pub max_attempts: u32,
}

impl Default for PollBackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_delay_ms: 15_000,
            max_attempts: 60,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RenderEngineConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.api_key.is_none());
        assert!(config.rate_limit_rps.is_none());

        let backoff = PollBackoffConfig::default();
        assert!(backoff.base_delay_ms <= backoff.max_delay_ms);
        assert!(backoff.max_attempts > 0);
    }
}
