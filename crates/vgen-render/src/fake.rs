//! In-memory render engine for tests.
//!
//! Accepts every submission (unless told to reject), hands out sequential
//! ids and lets the test drive each job through the state machine, either
//! directly or with a script consumed one step per status poll.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use vgen_models::{JobId, RenderJob, RenderStatus};

use crate::engine::RenderEngine;
use crate::error::{RenderError, RenderResult};
use crate::types::RenderSubmission;

#[derive(Default)]
struct State {
    jobs: HashMap<JobId, RenderJob>,
    scripts: HashMap<JobId, VecDeque<RenderStatus>>,
    submissions: Vec<RenderSubmission>,
    rejection: Option<(u16, String)>,
    panic_message: Option<String>,
}

/// Scripted engine. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct FakeRenderEngine {
    state: Mutex<State>,
    next_id: AtomicUsize,
    status_calls: AtomicUsize,
}

impl FakeRenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail every following submission with this upstream status.
    pub fn reject_submissions(&self, status: u16, message: impl Into<String>) {
        self.state().rejection = Some((status, message.into()));
    }

    /// Panic inside every following submission, as a buggy engine would.
    pub fn panic_on_submit(&self, message: impl Into<String>) {
        self.state().panic_message = Some(message.into());
    }

    /// Every submission accepted so far, oldest first.
    pub fn submissions(&self) -> Vec<RenderSubmission> {
        self.state().submissions.clone()
    }

    /// Number of `get_status` calls served.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Statuses the job reports on successive polls; the last one sticks.
    pub fn script(&self, job_id: &JobId, statuses: impl IntoIterator<Item = RenderStatus>) {
        self.state()
            .scripts
            .insert(job_id.clone(), statuses.into_iter().collect());
    }

    /// Move a job to `status` now.
    pub fn set_status(&self, job_id: &JobId, status: RenderStatus) {
        if let Some(job) = self.state().jobs.get_mut(job_id) {
            apply_status(job, status);
        }
    }
}

fn apply_status(job: &mut RenderJob, status: RenderStatus) {
    job.status = status;
    job.updated_at = Utc::now();
    match status {
        RenderStatus::Done => {
            job.url = Some(format!("https://cdn.example.com/renders/{}.mp4", job.id));
            job.poster = Some(format!("https://cdn.example.com/renders/{}-poster.jpg", job.id));
            job.thumbnail = Some(format!("https://cdn.example.com/renders/{}-thumb.jpg", job.id));
        }
        RenderStatus::Failed => {
            job.error = Some("render failed".to_string());
        }
        RenderStatus::Queued | RenderStatus::Rendering => {}
    }
}

#[async_trait]
impl RenderEngine for FakeRenderEngine {
    async fn submit(&self, submission: &RenderSubmission) -> RenderResult<JobId> {
        let mut state = self.state();
        if let Some(message) = state.panic_message.clone() {
            drop(state);
            panic!("{}", message);
        }
        if let Some((status, message)) = &state.rejection {
            return Err(RenderError::submission(Some(*status), message.clone()));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = JobId::from_string(format!("job-{:04}", n));
        let now = Utc::now();
        state.jobs.insert(
            id.clone(),
            RenderJob {
                id: id.clone(),
                status: RenderStatus::Queued,
                url: None,
                poster: None,
                thumbnail: None,
                error: None,
                created_at: now,
                updated_at: now,
            },
        );
        state.submissions.push(submission.clone());
        Ok(id)
    }

    async fn get_status(&self, job_id: &JobId) -> RenderResult<RenderJob> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state();
        let next = state.scripts.get_mut(job_id).and_then(|script| {
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            }
        });

        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| RenderError::JobNotFound(job_id.clone()))?;
        if let Some(status) = next {
            if status != job.status {
                apply_status(job, status);
            }
        }
        Ok(job.clone())
    }
}
