//! Render submission and status handlers.
//!
//! Every submit endpoint runs the same pipeline: validate and compile the
//! request without I/O, then hand the plan to the render engine. Validation
//! failures never reach the engine.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use schemars::schema::RootSchema;
use serde::Serialize;
use tracing::info;

use vgen_models::{
    AspectRatio, IntroOutroKind, IntroOutroRequest, JobId, Millis, RenderJob, RenderStatus,
    ScenesRequest, SingleTitleRequest, VideoRequest,
};
use vgen_render::SubmittedJob;
use vgen_timeline::{plan_render, RenderPlan};

use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_render_rejection, record_render_request};
use crate::state::AppState;

const MAX_JOB_ID_LENGTH: usize = 128;

// ============================================================================
// Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenesSubmitResponse {
    pub job_id: JobId,
    pub status: RenderStatus,
    pub scene_count: usize,
    /// Seconds
    pub total_duration: Millis,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroOutroSubmitResponse {
    pub job_id: JobId,
    pub status: RenderStatus,
    pub kind: IntroOutroKind,
    /// Seconds
    pub duration: Millis,
    pub aspect_ratio: AspectRatio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStatusResponse {
    pub id: JobId,
    pub status: RenderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RenderJob> for RenderStatusResponse {
    fn from(job: RenderJob) -> Self {
        Self {
            id: job.id,
            status: job.status,
            url: job.url,
            poster: job.poster,
            thumbnail: job.thumbnail,
            created: job.created_at,
            updated: job.updated_at,
            error: job.error,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit a single title card.
pub async fn submit_title(
    State(state): State<AppState>,
    payload: Result<Json<SingleTitleRequest>, JsonRejection>,
) -> ApiResult<Json<SubmittedJob>> {
    let Json(request) = payload?;
    let (_, job) = plan_and_submit(&state, VideoRequest::SingleTitle(request)).await?;
    Ok(Json(job))
}

/// Submit a multi-scene video.
pub async fn submit_scenes(
    State(state): State<AppState>,
    payload: Result<Json<ScenesRequest>, JsonRejection>,
) -> ApiResult<Json<ScenesSubmitResponse>> {
    let Json(request) = payload?;
    let (plan, job) = plan_and_submit(&state, VideoRequest::Scenes(request)).await?;

    Ok(Json(ScenesSubmitResponse {
        job_id: job.job_id,
        status: job.status,
        scene_count: plan.scene_count,
        total_duration: plan.total_duration,
    }))
}

/// Submit an intro or outro card.
pub async fn submit_intro_outro(
    State(state): State<AppState>,
    payload: Result<Json<IntroOutroRequest>, JsonRejection>,
) -> ApiResult<Json<IntroOutroSubmitResponse>> {
    let Json(request) = payload?;
    let kind = request.kind;
    let (plan, job) = plan_and_submit(&state, VideoRequest::IntroOutro(request)).await?;

    Ok(Json(IntroOutroSubmitResponse {
        job_id: job.job_id,
        status: job.status,
        kind,
        duration: plan.total_duration,
        aspect_ratio: plan.output.aspect_ratio,
    }))
}

/// Compile any request without submitting it.
pub async fn preview_render(
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> ApiResult<Json<RenderPlan>> {
    let Json(request) = payload?;
    let plan = plan_render(&request)?;
    Ok(Json(plan))
}

/// JSON Schema of the tagged request body accepted by the preview endpoint.
pub async fn request_schema() -> Json<RootSchema> {
    Json(schemars::schema_for!(VideoRequest))
}

/// Current status of a render job, straight from the engine.
pub async fn get_render_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<RenderStatusResponse>> {
    let job_id = parse_job_id(&job_id)?;
    let job = state.tracker.poll(&job_id).await?;
    Ok(Json(job.into()))
}

// ============================================================================
// Helpers
// ============================================================================

async fn plan_and_submit(
    state: &AppState,
    request: VideoRequest,
) -> ApiResult<(RenderPlan, SubmittedJob)> {
    let kind = request.kind_label();

    let plan = plan_render(&request).map_err(|e| {
        info!(kind = kind, error = %e, "Render request rejected");
        record_render_rejection(kind, "validation_error");
        ApiError::from(e)
    })?;

    let job = state.client.submit(&plan).await?;
    record_render_request(kind);

    Ok((plan, job))
}

/// Job ids are opaque but must be a single safe path segment.
fn parse_job_id(raw: &str) -> ApiResult<JobId> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_JOB_ID_LENGTH
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(JobId::from_string(raw))
    } else {
        Err(ApiError::validation("invalid job id"))
    }
}
