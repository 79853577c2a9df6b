//! Audio layering over a compiled timeline.
//!
//! Music becomes the timeline soundtrack and spans the whole video with the
//! fade envelope picked by the request form. Voice-over goes on its own
//! audio track, inset like the title so it never starts at zero nor ends on
//! the boundary. The two are mixed independently; there is no ducking.

use tracing::debug;

use vgen_models::{Asset, Clip, Millis, Soundtrack, SoundtrackEffect, Timeline, Track, TrackKind};

use crate::compiler::Inset;
use crate::error::{TimelineError, TimelineResult};

/// One remote audio source and its volume.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioLayer {
    pub src: String,
    pub volume: f64,
}

/// Audio to attach to a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPlan {
    pub music: Option<AudioLayer>,
    pub voice: Option<AudioLayer>,
    /// Soundtrack fade envelope
    pub fade: SoundtrackEffect,
}

impl AudioPlan {
    /// No audio at all.
    pub fn silent(fade: SoundtrackEffect) -> Self {
        Self {
            music: None,
            voice: None,
            fade,
        }
    }
}

/// Attaches voice and music layers without touching visual timing.
#[derive(Debug, Clone)]
pub struct TrackComposer {
    voice_inset: Inset,
}

impl TrackComposer {
    pub fn new(voice_inset: Inset) -> Self {
        Self { voice_inset }
    }

    pub fn compose(&self, mut timeline: Timeline, audio: &AudioPlan) -> TimelineResult<Timeline> {
        if timeline.duration.is_zero() {
            return Err(TimelineError::validation(
                "cannot add audio to an empty timeline",
            ));
        }

        if let Some(music) = &audio.music {
            timeline.soundtrack = Some(Soundtrack {
                src: music.src.clone(),
                volume: music.volume,
                effect: audio.fade,
            });
        }

        if let Some(voice) = &audio.voice {
            let (start, length) = self.voice_inset.apply(Millis::ZERO, timeline.duration);
            let mut track = Track::new(TrackKind::Voice);
            track.clips.push(Clip::new(
                Asset::Audio {
                    src: voice.src.clone(),
                    volume: voice.volume,
                },
                start,
                length,
            ));
            timeline.tracks.push(track);
        }

        debug!(
            music = audio.music.is_some(),
            voice = audio.voice.is_some(),
            fade = ?audio.fade,
            "Composed audio layers"
        );

        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{InsetProfile, TimelineCompiler};
    use vgen_models::Scene;

    fn compiled(secs: u64) -> Timeline {
        TimelineCompiler::new(InsetProfile::SINGLE_TITLE)
            .compile(&[Scene::new(Millis::from_secs(secs)).with_title("Hello")])
            .unwrap()
    }

    fn layer(src: &str, volume: f64) -> AudioLayer {
        AudioLayer {
            src: src.to_string(),
            volume,
        }
    }

    #[test]
    fn test_music_spans_whole_timeline() {
        let plan = AudioPlan {
            music: Some(layer("https://cdn.example.com/music.mp3", 0.3)),
            voice: None,
            fade: SoundtrackEffect::FadeInFadeOut,
        };
        let timeline = TrackComposer::new(InsetProfile::SINGLE_TITLE.title)
            .compose(compiled(15), &plan)
            .unwrap();

        let soundtrack = timeline.soundtrack.as_ref().unwrap();
        assert_eq!(soundtrack.volume, 0.3);
        assert_eq!(soundtrack.effect, SoundtrackEffect::FadeInFadeOut);
        assert!(timeline.track(TrackKind::Voice).is_none());
    }

    #[test]
    fn test_voice_is_inset() {
        let plan = AudioPlan {
            music: None,
            voice: Some(layer("https://cdn.example.com/voice.mp3", 1.0)),
            fade: SoundtrackEffect::FadeIn,
        };
        let timeline = TrackComposer::new(InsetProfile::SINGLE_TITLE.title)
            .compose(compiled(15), &plan)
            .unwrap();

        let voice = &timeline.track(TrackKind::Voice).unwrap().clips[0];
        assert_eq!(voice.start, Millis::from_millis(500));
        assert_eq!(voice.end(), Millis::from_millis(14500));
        assert!(voice.asset.is_audio());
        assert_eq!(timeline.tracks.last().unwrap().kind, TrackKind::Voice);
        assert!(timeline.soundtrack.is_none());
    }

    #[test]
    fn test_visual_tracks_untouched() {
        let before = compiled(8);
        let plan = AudioPlan {
            music: Some(layer("https://cdn.example.com/m.mp3", 0.5)),
            voice: Some(layer("https://cdn.example.com/v.mp3", 0.8)),
            fade: SoundtrackEffect::FadeOut,
        };
        let after = TrackComposer::new(Inset::from_millis(300, 300))
            .compose(before.clone(), &plan)
            .unwrap();

        assert_eq!(after.duration, before.duration);
        assert_eq!(&after.tracks[..before.tracks.len()], &before.tracks[..]);
        assert_eq!(after.tracks.len(), before.tracks.len() + 1);
    }

    #[test]
    fn test_silent_plan_is_identity() {
        let before = compiled(5);
        let after = TrackComposer::new(Inset::NONE)
            .compose(before.clone(), &AudioPlan::silent(SoundtrackEffect::FadeInFadeOut))
            .unwrap();
        assert_eq!(after, before);
    }
}
