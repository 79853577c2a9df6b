//! Render job status polling.
//!
//! The tracker keeps no job state: every call asks the engine. Waiting for
//! completion polls with exponential backoff and jitter, capped, and never
//! shortens the gap between two polls.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info_span, warn, Instrument};

use vgen_models::{JobId, RenderJob, RenderStatus};

use crate::config::PollBackoffConfig;
use crate::engine::RenderEngine;
use crate::error::{RenderError, RenderResult};
use crate::metrics::record_poll;

/// Reads job status from the render engine.
#[derive(Clone)]
pub struct RenderJobTracker {
    engine: Arc<dyn RenderEngine>,
}

impl RenderJobTracker {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Single status check. Repeated polls of a finished job return the
    /// same result.
    pub async fn poll(&self, job_id: &JobId) -> RenderResult<RenderJob> {
        match self.engine.get_status(job_id).await {
            Ok(job) => {
                record_poll(job.status.as_str());
                debug!(job_id = %job_id, status = %job.status, "Polled render job");
                Ok(job)
            }
            Err(e) => {
                record_poll("error");
                Err(e)
            }
        }
    }

    /// Poll until the job is done or failed, or the attempt budget runs out.
    ///
    /// A poll error ends the wait immediately; retrying it is the caller's
    /// decision.
    pub async fn wait_for_terminal(
        &self,
        job_id: &JobId,
        backoff: &PollBackoffConfig,
    ) -> RenderResult<RenderJob> {
        let span = info_span!("render_wait", job_id = %job_id);

        async {
            let mut previous: Option<RenderStatus> = None;
            let mut delay = Duration::ZERO;

            for attempt in 0..backoff.max_attempts {
                let job = self.poll(job_id).await?;

                if let Some(prev) = previous {
                    if !job.status.is_reachable_from(prev) {
                        warn!(
                            from = %prev,
                            to = %job.status,
                            "Render job status went backwards"
                        );
                    }
                }
                if job.is_terminal() {
                    return Ok(job);
                }
                previous = Some(job.status);

                if attempt + 1 < backoff.max_attempts {
                    delay = next_delay(backoff, attempt, delay);
                    debug!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Render job not finished, waiting"
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            Err(RenderError::PollTimeout {
                job_id: job_id.clone(),
                attempts: backoff.max_attempts,
            })
        }
        .instrument(span)
        .await
    }
}

/// Delay before the poll following `attempt` (0-based).
///
/// Exponential backoff capped at `max_delay_ms`, jittered into the upper
/// half of the step, and never shorter than `previous`.
pub(crate) fn next_delay(config: &PollBackoffConfig, attempt: u32, previous: Duration) -> Duration {
    let max = config.max_delay_ms.max(config.base_delay_ms);
    let exp_delay = config
        .base_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    let capped = exp_delay.min(max);

    let jittered = if capped > 1 {
        rand::rng().random_range(capped / 2..=capped)
    } else {
        capped
    };

    Duration::from_millis(jittered)
        .max(previous)
        .min(Duration::from_millis(max))
}
