//! Scene list to visual tracks.
//!
//! A running cursor places each scene's background at `[t, t + duration)`.
//! Title and subtitle clips sit inside that window, inset so text never
//! shows before its background nor lingers past the scene end. The first
//! scene always fades in and the last always fades out; everything in
//! between uses the caller's transitions.

use tracing::debug;

use vgen_models::{
    Asset, Clip, ClipTransition, Fit, Millis, Position, Scene, TextStyle, Timeline, Track,
    TrackKind, Transition,
};

use crate::error::{TimelineError, TimelineResult};

/// Scale of the logo overlay relative to the frame.
const LOGO_SCALE: f64 = 0.25;

/// Extra lead of the intro/outro subtitle over the title.
const SUBTITLE_DELAY: Millis = Millis::from_millis(300);

/// Leading and trailing margin inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inset {
    pub lead: Millis,
    pub tail: Millis,
}

impl Inset {
    pub const NONE: Inset = Inset::from_millis(0, 0);

    pub const fn from_millis(lead: u64, tail: u64) -> Self {
        Self {
            lead: Millis::from_millis(lead),
            tail: Millis::from_millis(tail),
        }
    }

    /// Apply the inset to `[start, start + length)`, returning the inner
    /// `(start, length)`.
    ///
    /// Windows not longer than `lead + tail`, or whose inset start would
    /// not fit, are returned unchanged.
    pub fn apply(&self, start: Millis, length: Millis) -> (Millis, Millis) {
        let inner = self
            .lead
            .checked_add(self.tail)
            .and_then(|margins| length.checked_sub(margins))
            .filter(|inner| !inner.is_zero());
        match (inner, start.checked_add(self.lead)) {
            (Some(inner), Some(inset_start)) => (inset_start, inner),
            _ => (start, length),
        }
    }
}

/// Insets for the text layers of one request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsetProfile {
    pub title: Inset,
    pub subtitle: Inset,
}

impl InsetProfile {
    /// Single title card.
    pub const SINGLE_TITLE: InsetProfile = InsetProfile {
        title: Inset::from_millis(500, 500),
        subtitle: Inset::from_millis(1000, 500),
    };

    /// Multi-scene video.
    pub const SCENES: InsetProfile = InsetProfile {
        title: Inset::from_millis(300, 300),
        subtitle: Inset::from_millis(600, 300),
    };

    /// Intro/outro card: text follows the requested fades.
    pub fn intro_outro(fade_in: Millis, fade_out: Millis) -> Self {
        Self {
            title: Inset {
                lead: fade_in,
                tail: fade_out,
            },
            subtitle: Inset {
                lead: fade_in.saturating_add(SUBTITLE_DELAY),
                tail: fade_out,
            },
        }
    }
}

/// Compiles normalized scenes into a timeline of visual tracks.
#[derive(Debug, Clone)]
pub struct TimelineCompiler {
    insets: InsetProfile,
}

impl TimelineCompiler {
    pub fn new(insets: InsetProfile) -> Self {
        Self { insets }
    }

    /// Lay the scenes out back to back.
    ///
    /// Pure: the same scenes always produce the same timeline.
    pub fn compile(&self, scenes: &[Scene]) -> TimelineResult<Timeline> {
        if scenes.is_empty() {
            return Err(TimelineError::validation(
                "at least one scene is required",
            ));
        }

        let mut titles = Track::new(TrackKind::Title);
        let mut subtitles = Track::new(TrackKind::Subtitle);
        let mut overlays = Track::new(TrackKind::Overlay);
        let mut backgrounds = Track::new(TrackKind::Background);

        let last = scenes.len() - 1;
        let mut cursor = Millis::ZERO;

        for (index, scene) in scenes.iter().enumerate() {
            if scene.duration.is_zero() {
                return Err(TimelineError::validation(format!(
                    "scene {} duration must be greater than zero",
                    index + 1
                )));
            }

            let transition = ClipTransition::new(
                if index == 0 { Transition::Fade } else { scene.transition_in },
                if index == last { Transition::Fade } else { scene.transition_out },
            );
            let text_transition = scene
                .text_transition
                .map(|t| ClipTransition::new(t, t))
                .unwrap_or(transition);

            backgrounds
                .clips
                .push(background_clip(scene, cursor, transition));

            if let Some(text) = &scene.title {
                let (start, length) = self.insets.title.apply(cursor, scene.duration);
                let mut clip = Clip::new(
                    Asset::Title {
                        text: text.clone(),
                        style: scene.text_style,
                        color: None,
                        position: scene.title_position,
                    },
                    start,
                    length,
                );
                clip.transition = Some(text_transition);
                titles.clips.push(clip);
            }

            if let Some(text) = &scene.subtitle {
                let (start, length) = self.insets.subtitle.apply(cursor, scene.duration);
                let mut clip = Clip::new(
                    Asset::Title {
                        text: text.clone(),
                        style: TextStyle::Subtitle,
                        color: None,
                        position: Position::Bottom,
                    },
                    start,
                    length,
                );
                clip.transition = Some(text_transition);
                subtitles.clips.push(clip);
            }

            if let Some(logo) = &scene.logo {
                let mut clip = Clip::new(
                    Asset::Image { src: logo.clone() },
                    cursor,
                    scene.duration,
                );
                clip.fit = Some(Fit::Contain);
                clip.position = Some(Position::Top);
                clip.scale = Some(LOGO_SCALE);
                clip.transition = Some(ClipTransition::new(Transition::Fade, Transition::Fade));
                overlays.clips.push(clip);
            }

            cursor = cursor.checked_add(scene.duration).ok_or_else(|| {
                TimelineError::validation("total duration is too long")
            })?;
        }

        let tracks: Vec<Track> = [titles, subtitles, overlays, backgrounds]
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();

        debug!(
            scene_count = scenes.len(),
            track_count = tracks.len(),
            duration_ms = cursor.as_millis(),
            "Compiled timeline"
        );

        Ok(Timeline {
            background: scenes[0].background_color.clone(),
            tracks,
            soundtrack: None,
            duration: cursor,
        })
    }
}

fn background_clip(scene: &Scene, start: Millis, transition: ClipTransition) -> Clip {
    let mut clip = match &scene.background_image {
        Some(src) => {
            let mut clip = Clip::new(Asset::Image { src: src.clone() }, start, scene.duration);
            clip.fit = Some(Fit::Cover);
            clip.effect = scene.effect;
            clip
        }
        None => Clip::new(
            Asset::Color {
                color: scene.background_color.clone(),
            },
            start,
            scene.duration,
        ),
    };
    clip.transition = Some(transition);
    clip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(secs: u64) -> Scene {
        Scene::new(Millis::from_secs(secs))
    }

    fn backgrounds(timeline: &Timeline) -> &Track {
        timeline.track(TrackKind::Background).unwrap()
    }

    #[test]
    fn test_inset_apply() {
        let inset = Inset::from_millis(300, 300);
        assert_eq!(
            inset.apply(Millis::from_secs(5), Millis::from_secs(5)),
            (Millis::from_millis(5300), Millis::from_millis(4400))
        );
        // Too short for the margins: whole window.
        assert_eq!(
            inset.apply(Millis::ZERO, Millis::from_millis(600)),
            (Millis::ZERO, Millis::from_millis(600))
        );
        assert_eq!(
            Inset::NONE.apply(Millis::ZERO, Millis::from_secs(1)),
            (Millis::ZERO, Millis::from_secs(1))
        );
        // Margins or start past the end of the time range: whole window.
        let huge = Inset {
            lead: Millis::from_millis(u64::MAX),
            tail: Millis::from_millis(1),
        };
        assert_eq!(
            huge.apply(Millis::ZERO, Millis::from_secs(5)),
            (Millis::ZERO, Millis::from_secs(5))
        );
        let end = Millis::from_millis(u64::MAX - 10);
        assert_eq!(
            inset.apply(end, Millis::from_secs(5)),
            (end, Millis::from_secs(5))
        );
    }

    #[test]
    fn test_intro_outro_subtitle_lead_saturates() {
        let profile = InsetProfile::intro_outro(Millis::from_millis(u64::MAX), Millis::ZERO);
        assert_eq!(profile.subtitle.lead, Millis::from_millis(u64::MAX));
        let profile = InsetProfile::intro_outro(Millis::from_millis(500), Millis::from_millis(1000));
        assert_eq!(profile.subtitle.lead, Millis::from_millis(800));
    }

    #[test]
    fn test_empty_scene_list_rejected() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let err = compiler.compile(&[]).unwrap_err();
        assert!(matches!(err, TimelineError::Validation(_)));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let err = compiler
            .compile(&[scene(3), Scene::new(Millis::ZERO)])
            .unwrap_err();
        assert_eq!(
            err,
            TimelineError::validation("scene 2 duration must be greater than zero")
        );
    }

    #[test]
    fn test_total_duration_is_sum_of_scenes() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let inputs: [&[u64]; 4] = [&[5], &[5, 5, 5], &[1, 2, 3, 4, 5, 6], &[30, 1]];
        for durations in inputs {
            let scenes: Vec<Scene> = durations.iter().map(|d| scene(*d)).collect();
            let timeline = compiler.compile(&scenes).unwrap();
            let expected: Millis = scenes.iter().map(|s| s.duration).sum();
            assert_eq!(timeline.duration, expected);
            assert_eq!(backgrounds(&timeline).end(), expected);
        }
    }

    #[test]
    fn test_fractional_durations_do_not_drift() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let scenes: Vec<Scene> = (0..300)
            .map(|_| Scene::new(Millis::from_secs_f64(0.1).unwrap()))
            .collect();
        let timeline = compiler.compile(&scenes).unwrap();
        assert_eq!(timeline.duration, Millis::from_secs(30));
    }

    #[test]
    fn test_tracks_never_overlap() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let scenes: Vec<Scene> = [1u64, 4, 2, 7]
            .iter()
            .map(|d| scene(*d).with_title("Title").with_subtitle("Sub"))
            .collect();
        let timeline = compiler.compile(&scenes).unwrap();

        assert_eq!(timeline.tracks.len(), 3);
        for track in &timeline.tracks {
            assert!(track.is_non_overlapping(), "{:?} overlaps", track.kind);
            for clip in &track.clips {
                assert!(clip.end() <= timeline.duration);
                assert!(!clip.length.is_zero());
            }
        }
    }

    #[test]
    fn test_title_and_subtitle_insets() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let scenes = vec![scene(5), scene(5).with_title("Two").with_subtitle("Sub")];
        let timeline = compiler.compile(&scenes).unwrap();

        let title = &timeline.track(TrackKind::Title).unwrap().clips[0];
        assert_eq!(title.start, Millis::from_millis(5300));
        assert_eq!(title.end(), Millis::from_millis(9700));

        let subtitle = &timeline.track(TrackKind::Subtitle).unwrap().clips[0];
        assert_eq!(subtitle.start, Millis::from_millis(5600));
        assert_eq!(subtitle.end(), Millis::from_millis(9700));
        assert!(matches!(
            subtitle.asset,
            Asset::Title {
                style: TextStyle::Subtitle,
                ..
            }
        ));
    }

    #[test]
    fn test_boundary_rule() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let scenes: Vec<Scene> = (0..3)
            .map(|_| scene(5).with_transitions(Transition::WipeLeft, Transition::WipeLeft))
            .collect();
        let timeline = compiler.compile(&scenes).unwrap();
        let clips = &backgrounds(&timeline).clips;

        let t = |i: usize| clips[i].transition.unwrap();
        assert_eq!(t(0).incoming, Some(Transition::Fade));
        assert_eq!(t(0).outgoing, Some(Transition::WipeLeft));
        assert_eq!(t(1).incoming, Some(Transition::WipeLeft));
        assert_eq!(t(1).outgoing, Some(Transition::WipeLeft));
        assert_eq!(t(2).incoming, Some(Transition::WipeLeft));
        assert_eq!(t(2).outgoing, Some(Transition::Fade));
    }

    #[test]
    fn test_single_scene_fades_both_ends() {
        let compiler = TimelineCompiler::new(InsetProfile::SINGLE_TITLE);
        let scenes = vec![scene(15).with_transitions(Transition::Zoom, Transition::Reveal)];
        let timeline = compiler.compile(&scenes).unwrap();
        let transition = backgrounds(&timeline).clips[0].transition.unwrap();
        assert_eq!(transition, ClipTransition::new(Transition::Fade, Transition::Fade));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let mut with_image = scene(4).with_title("A");
        with_image.background_image = Some("https://cdn.example.com/a.jpg".to_string());
        let scenes = vec![with_image, scene(2).with_subtitle("B")];

        let first = compiler.compile(&scenes).unwrap();
        let second = compiler.compile(&scenes).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_background_image_and_logo() {
        let compiler = TimelineCompiler::new(InsetProfile::SCENES);
        let mut card = scene(5);
        card.background_image = Some("https://cdn.example.com/bg.jpg".to_string());
        card.logo = Some("https://cdn.example.com/logo.png".to_string());
        let timeline = compiler.compile(&[card]).unwrap();

        let background = &backgrounds(&timeline).clips[0];
        assert_eq!(background.fit, Some(Fit::Cover));
        assert!(matches!(background.asset, Asset::Image { .. }));

        let logo = &timeline.track(TrackKind::Overlay).unwrap().clips[0];
        assert_eq!(logo.start, Millis::ZERO);
        assert_eq!(logo.length, Millis::from_secs(5));
        assert_eq!(logo.position, Some(Position::Top));
    }
}
