//! Request to submit-ready plan, with no I/O.

use serde::Serialize;
use tracing::info;

use vgen_models::{Millis, OutputSpec, Timeline, VideoRequest};

use crate::compiler::TimelineCompiler;
use crate::composer::TrackComposer;
use crate::error::TimelineResult;
use crate::normalize::{Normalize, NormalizedVideo, VideoKind};
use crate::output::OutputResolver;

/// Everything the render engine needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub kind: VideoKind,
    pub timeline: Timeline,
    pub output: OutputSpec,
    pub scene_count: usize,
    pub total_duration: Millis,
}

/// Normalize, compile, compose and resolve output for a request.
pub fn plan_render(request: &VideoRequest) -> TimelineResult<RenderPlan> {
    plan_normalized(request.normalize()?)
}

/// Build a plan from an already normalized request.
pub fn plan_normalized(video: NormalizedVideo) -> TimelineResult<RenderPlan> {
    let timeline = TimelineCompiler::new(video.insets).compile(&video.scenes)?;
    let timeline = TrackComposer::new(video.insets.title).compose(timeline, &video.audio)?;
    let output = OutputResolver::resolve(&video.output);

    info!(
        kind = %video.kind,
        scene_count = video.scenes.len(),
        duration_ms = timeline.duration.as_millis(),
        width = output.size.width,
        height = output.size.height,
        "Planned render"
    );

    Ok(RenderPlan {
        kind: video.kind,
        scene_count: video.scenes.len(),
        total_duration: timeline.duration,
        timeline,
        output,
    })
}
