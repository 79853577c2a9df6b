//! Render submission.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use vgen_models::RenderStatus;
use vgen_timeline::RenderPlan;

use crate::engine::RenderEngine;
use crate::error::RenderResult;
use crate::metrics::record_submission;
use crate::types::{RenderSubmission, SubmittedJob};

/// Submits compiled plans to the render engine.
///
/// Stateless: the returned job id is the only handle on the job, and it is
/// the caller's to keep.
#[derive(Clone)]
pub struct RenderJobClient {
    engine: Arc<dyn RenderEngine>,
    callback_url: Option<String>,
}

impl RenderJobClient {
    pub fn new(engine: Arc<dyn RenderEngine>, callback_url: Option<String>) -> Self {
        Self {
            engine,
            callback_url,
        }
    }

    pub async fn submit(&self, plan: &RenderPlan) -> RenderResult<SubmittedJob> {
        let submission = RenderSubmission {
            timeline: plan.timeline.clone(),
            output: plan.output,
            callback: self.callback_url.clone(),
        };

        let start = Instant::now();
        let result = self.engine.submit(&submission).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        record_submission(plan.kind.as_str(), result.is_ok(), latency_ms);

        match result {
            Ok(job_id) => {
                info!(
                    job_id = %job_id,
                    kind = %plan.kind,
                    scene_count = plan.scene_count,
                    duration_ms = plan.total_duration.as_millis(),
                    "Render submitted"
                );
                Ok(SubmittedJob {
                    job_id,
                    status: RenderStatus::Queued,
                })
            }
            Err(e) => {
                warn!(kind = %plan.kind, error = %e, "Render submission failed");
                Err(e)
            }
        }
    }
}
