//! Render engine wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use vgen_models::{JobId, OutputSpec, RenderJob, RenderStatus, Timeline};

/// Body of a render submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSubmission {
    pub timeline: Timeline,
    pub output: OutputSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

/// Returned to the caller after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedJob {
    pub job_id: JobId,
    pub status: RenderStatus,
}

/// Envelope wrapping every engine response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub response: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub id: String,
}

/// Job snapshot as the engine reports it.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub id: String,
    pub status: String,
    pub url: Option<String>,
    pub poster: Option<String>,
    pub thumbnail: Option<String>,
    pub error: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl StatusResponse {
    pub fn into_job(self) -> RenderJob {
        let status = RenderStatus::from_engine(&self.status).unwrap_or_else(|| {
            warn!(
                job_id = %self.id,
                engine_status = %self.status,
                "Unknown engine status, treating as rendering"
            );
            RenderStatus::Rendering
        });

        let now = Utc::now();
        let created_at = self.created.unwrap_or(now);

        RenderJob {
            id: JobId::from_string(self.id),
            status,
            url: self.url.filter(|u| !u.is_empty()),
            poster: self.poster.filter(|u| !u.is_empty()),
            thumbnail: self.thumbnail.filter(|u| !u.is_empty()),
            error: self.error.filter(|e| !e.is_empty()),
            created_at,
            updated_at: self.updated.unwrap_or(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgen_models::{SingleTitleRequest, VideoRequest};
    use vgen_timeline::plan_render;

    #[test]
    fn test_status_response_maps_intermediate_stages() {
        let json = r#"{
            "id": "d2b46ed6",
            "status": "preprocessing",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-01T00:00:05Z"
        }"#;
        let job = serde_json::from_str::<StatusResponse>(json).unwrap().into_job();

        assert_eq!(job.id.as_str(), "d2b46ed6");
        assert_eq!(job.status, RenderStatus::Rendering);
        assert!(job.updated_at > job.created_at);
    }

    #[test]
    fn test_unknown_status_is_rendering() {
        let json = r#"{"id": "x", "status": "warming-up"}"#;
        let job = serde_json::from_str::<StatusResponse>(json).unwrap().into_job();
        assert_eq!(job.status, RenderStatus::Rendering);
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn test_submission_omits_missing_callback() {
        let request = VideoRequest::SingleTitle(SingleTitleRequest {
            title: Some("Hello".to_string()),
            ..Default::default()
        });
        let plan = plan_render(&request).unwrap();
        let submission = RenderSubmission {
            timeline: plan.timeline,
            output: plan.output,
            callback: None,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert!(json.get("callback").is_none());
        assert!(json.get("timeline").is_some());
    }
}
