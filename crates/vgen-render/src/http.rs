//! HTTP render engine client.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use vgen_models::{JobId, RenderJob};

use crate::config::RenderEngineConfig;
use crate::engine::RenderEngine;
use crate::error::{RenderError, RenderResult};
use crate::types::{Envelope, RenderSubmission, StatusResponse, SubmitResponse};

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the external render engine's REST API.
pub struct HttpRenderEngine {
    http: Client,
    config: RenderEngineConfig,
}

impl HttpRenderEngine {
    /// Create a new engine client.
    ///
    /// A missing API key is not an error here; each request reports it.
    pub fn new(config: RenderEngineConfig) -> RenderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                RenderError::configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> RenderResult<Self> {
        Self::new(RenderEngineConfig::from_env())
    }

    pub fn config(&self) -> &RenderEngineConfig {
        &self.config
    }

    fn api_key(&self) -> RenderResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| RenderError::configuration("RENDER_API_KEY is not set"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl RenderEngine for HttpRenderEngine {
    async fn submit(&self, submission: &RenderSubmission) -> RenderResult<JobId> {
        let api_key = self.api_key()?;
        let url = self.url("render");

        debug!(url = %url, "Submitting render");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(submission)
            .send()
            .await
            .map_err(|e| RenderError::submission(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(
                status = status.as_u16(),
                message = %message,
                "Render engine rejected submission"
            );
            return Err(RenderError::submission(Some(status.as_u16()), message));
        }

        let body: SubmitResponse = read_envelope(response)
            .await
            .map_err(|message| RenderError::submission(Some(status.as_u16()), message))?;

        Ok(JobId::from_string(body.id))
    }

    async fn get_status(&self, job_id: &JobId) -> RenderResult<RenderJob> {
        let api_key = self.api_key()?;
        let url = self.url(&format!("render/{}", job_id));

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| RenderError::status(None, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RenderError::JobNotFound(job_id.clone()));
        }
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(
                job_id = %job_id,
                status = status.as_u16(),
                message = %message,
                "Render status check failed"
            );
            return Err(RenderError::status(Some(status.as_u16()), message));
        }

        let body: StatusResponse = read_envelope(response)
            .await
            .map_err(|message| RenderError::status(Some(status.as_u16()), message))?;

        Ok(body.into_job())
    }
}

/// Unwrap a successful response envelope, or describe why it is unusable.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| format!("invalid engine response: {}", e))?;

    if !envelope.success {
        return Err(non_empty_or(envelope.message, "engine reported failure"));
    }

    envelope
        .response
        .ok_or_else(|| non_empty_or(envelope.message, "engine response missing body"))
}

/// Best-effort message from a non-success response.
///
/// The engine puts the specific reason in `response.error` and a generic
/// one in `message`; the specific one wins.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
        Ok(envelope) => envelope
            .response
            .as_ref()
            .and_then(|detail| detail.get("error"))
            .and_then(serde_json::Value::as_str)
            .filter(|error| !error.trim().is_empty())
            .map(str::to_string)
            .unwrap_or(envelope.message),
        Err(_) => body,
    };

    non_empty_or(message, status.canonical_reason().unwrap_or("request failed"))
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
