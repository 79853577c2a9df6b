//! Client-side request ceiling for the render engine.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::trace;

use vgen_models::{JobId, RenderJob};

use crate::engine::RenderEngine;
use crate::error::RenderResult;
use crate::types::RenderSubmission;

type EngineRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Wraps an engine so submits and status checks share one token bucket.
///
/// Callers over the limit wait for a permit instead of failing.
pub struct RateLimitedEngine<E> {
    inner: E,
    limiter: EngineRateLimiter,
}

impl<E: RenderEngine> RateLimitedEngine<E> {
    pub fn new(inner: E, requests_per_second: NonZeroU32) -> Self {
        Self {
            inner,
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
        }
    }

    async fn acquire(&self) {
        if self.limiter.check().is_err() {
            trace!("Render engine rate limit reached, waiting for permit");
            self.limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl<E: RenderEngine> RenderEngine for RateLimitedEngine<E> {
    async fn submit(&self, submission: &RenderSubmission) -> RenderResult<JobId> {
        self.acquire().await;
        self.inner.submit(submission).await
    }

    async fn get_status(&self, job_id: &JobId) -> RenderResult<RenderJob> {
        self.acquire().await;
        self.inner.get_status(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeRenderEngine;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_waits_instead_of_failing() {
        let engine = RateLimitedEngine::new(FakeRenderEngine::new(), NonZeroU32::new(2).unwrap());
        let id = JobId::from_string("missing");

        let start = Instant::now();
        for _ in 0..4 {
            assert!(engine.get_status(&id).await.is_err());
        }
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert_eq!(engine.inner.status_calls(), 4);
    }
}
