//! Render engine abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use vgen_models::{JobId, RenderJob};

use crate::error::RenderResult;
use crate::types::RenderSubmission;

/// The two operations the external render engine exposes.
///
/// Implementations hold no job state; the engine is the source of truth
/// for every job it has accepted.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Hand a timeline to the engine, returning the id it assigned.
    async fn submit(&self, submission: &RenderSubmission) -> RenderResult<JobId>;

    /// Current snapshot of a job.
    async fn get_status(&self, job_id: &JobId) -> RenderResult<RenderJob>;
}

#[async_trait]
impl<E: RenderEngine + ?Sized> RenderEngine for Arc<E> {
    async fn submit(&self, submission: &RenderSubmission) -> RenderResult<JobId> {
        (**self).submit(submission).await
    }

    async fn get_status(&self, job_id: &JobId) -> RenderResult<RenderJob> {
        (**self).get_status(job_id).await
    }
}
