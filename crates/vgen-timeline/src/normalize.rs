//! Request validation and defaulting.
//!
//! Each request shape has one `normalize()` which either rejects the request
//! with a validation error or produces fully resolved scenes plus the audio,
//! output and inset settings the rest of the pipeline needs.

use serde::Serialize;
use std::fmt;
use url::Url;

use vgen_models::request::SceneInput;
use vgen_models::scene::DEFAULT_BACKGROUND_COLOR;
use vgen_models::{
    Effect, IntroOutroKind, IntroOutroRequest, Millis, Position, Scene, ScenesRequest,
    SingleTitleRequest, SoundtrackEffect, Transition, VideoRequest,
};

use crate::compiler::InsetProfile;
use crate::composer::{AudioLayer, AudioPlan};
use crate::error::{TimelineError, TimelineResult};
use crate::output::OutputTokens;

const SINGLE_TITLE_DURATION: Millis = Millis::from_secs(15);
const SCENE_DURATION: Millis = Millis::from_secs(5);
const INTRO_OUTRO_DURATION: Millis = Millis::from_secs(5);
const INTRO_OUTRO_FADE_IN: Millis = Millis::from_millis(500);
const INTRO_OUTRO_FADE_OUT: Millis = Millis::from_millis(1000);

const DEFAULT_MUSIC_VOLUME: f64 = 0.3;
const DEFAULT_VOICE_VOLUME: f64 = 1.0;

/// Longest accepted scene, card or fade.
const MAX_DURATION: Millis = Millis::from_secs(60 * 60);

/// Maximum characters kept from any text field.
const MAX_TEXT_LENGTH: usize = 500;
/// Maximum length of an asset URL.
const MAX_URL_LENGTH: usize = 2048;

/// Which request form produced a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    SingleTitle,
    Scenes,
    Intro,
    Outro,
}

impl VideoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoKind::SingleTitle => "single_title",
            VideoKind::Scenes => "scenes",
            VideoKind::Intro => "intro",
            VideoKind::Outro => "outro",
        }
    }
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<IntroOutroKind> for VideoKind {
    fn from(kind: IntroOutroKind) -> Self {
        match kind {
            IntroOutroKind::Intro => VideoKind::Intro,
            IntroOutroKind::Outro => VideoKind::Outro,
        }
    }
}

/// A validated request with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVideo {
    pub kind: VideoKind,
    /// Never empty
    pub scenes: Vec<Scene>,
    pub audio: AudioPlan,
    pub output: OutputTokens,
    pub insets: InsetProfile,
}

/// Validate a caller request and fill in its defaults.
pub trait Normalize {
    fn normalize(&self) -> TimelineResult<NormalizedVideo>;
}

impl Normalize for VideoRequest {
    fn normalize(&self) -> TimelineResult<NormalizedVideo> {
        match self {
            VideoRequest::SingleTitle(r) => r.normalize(),
            VideoRequest::Scenes(r) => r.normalize(),
            VideoRequest::IntroOutro(r) => r.normalize(),
        }
    }
}

impl Normalize for SingleTitleRequest {
    fn normalize(&self) -> TimelineResult<NormalizedVideo> {
        let title = clean_text(self.title.as_deref())
            .ok_or_else(|| TimelineError::validation("title is required"))?;

        let scene = Scene {
            title: Some(title),
            subtitle: clean_text(self.subtitle.as_deref()),
            background_image: asset_url("backgroundImage", self.background_image.as_deref())?,
            background_color: color("backgroundColor", self.background_color.as_deref())?,
            duration: duration("duration", self.duration, SINGLE_TITLE_DURATION)?,
            text_style: self.text_style.unwrap_or_default(),
            title_position: self.title_position.unwrap_or_default(),
            effect: self.effect,
            transition_in: Transition::Fade,
            transition_out: Transition::Fade,
            text_transition: None,
            logo: None,
        };

        Ok(NormalizedVideo {
            kind: VideoKind::SingleTitle,
            scenes: vec![scene],
            audio: audio_plan(
                self.music_ref.as_deref(),
                self.music_volume,
                self.voice_ref.as_deref(),
                self.voice_volume,
                SoundtrackEffect::FadeInFadeOut,
            )?,
            output: OutputTokens {
                aspect_ratio: self.aspect_ratio.clone(),
                resolution: self.resolution.clone(),
                format: self.format.clone(),
                quality: self.quality.clone(),
            },
            insets: InsetProfile::SINGLE_TITLE,
        })
    }
}

impl Normalize for ScenesRequest {
    fn normalize(&self) -> TimelineResult<NormalizedVideo> {
        if self.scenes.is_empty() {
            return Err(TimelineError::validation(
                "scenes must contain at least one scene",
            ));
        }

        let transition = self.transition_type.unwrap_or_default();
        let scenes = self
            .scenes
            .iter()
            .enumerate()
            .map(|(index, input)| normalize_scene(index, input, transition))
            .collect::<TimelineResult<Vec<_>>>()?;

        Ok(NormalizedVideo {
            kind: VideoKind::Scenes,
            scenes,
            audio: audio_plan(
                self.music_ref.as_deref(),
                self.music_volume,
                self.voice_ref.as_deref(),
                self.voice_volume,
                SoundtrackEffect::FadeInFadeOut,
            )?,
            output: OutputTokens {
                aspect_ratio: self.aspect_ratio.clone(),
                resolution: self.resolution.clone(),
                format: self.format.clone(),
                quality: self.quality.clone(),
            },
            insets: InsetProfile::SCENES,
        })
    }
}

fn normalize_scene(index: usize, input: &SceneInput, transition: Transition) -> TimelineResult<Scene> {
    let field = |name: &str| format!("scenes[{}].{}", index, name);

    Ok(Scene {
        title: clean_text(input.title.as_deref()),
        subtitle: clean_text(input.subtitle.as_deref()),
        background_image: asset_url(&field("backgroundImage"), input.background_image.as_deref())?,
        background_color: color(&field("backgroundColor"), input.background_color.as_deref())?,
        duration: duration(&field("duration"), input.duration, SCENE_DURATION)?,
        text_style: input.text_style.unwrap_or_default(),
        title_position: input.title_position.unwrap_or_default(),
        effect: input.effect,
        transition_in: input.transition_in.unwrap_or(transition),
        transition_out: input.transition_out.unwrap_or(transition),
        text_transition: None,
        logo: None,
    })
}

impl Normalize for IntroOutroRequest {
    fn normalize(&self) -> TimelineResult<NormalizedVideo> {
        let title = clean_text(self.title.as_deref())
            .or_else(|| clean_text(self.channel_name.as_deref()))
            .ok_or_else(|| TimelineError::validation("title or channelName is required"))?;
        let subtitle =
            clean_text(self.subtitle.as_deref()).or_else(|| clean_text(self.tagline.as_deref()));

        let total = duration("duration", self.duration, INTRO_OUTRO_DURATION)?;
        let fade_in = fade("fadeIn", self.fade_in, INTRO_OUTRO_FADE_IN)?;
        let fade_out = fade("fadeOut", self.fade_out, INTRO_OUTRO_FADE_OUT)?;
        match fade_in.checked_add(fade_out) {
            Some(fades) if fades <= total => {}
            _ => {
                return Err(TimelineError::validation(format!(
                    "fadeIn + fadeOut must not exceed duration ({})",
                    total
                )))
            }
        }

        let kind = VideoKind::from(self.kind);
        let scene = Scene {
            title: Some(title),
            subtitle,
            background_image: asset_url("backgroundImage", self.background_image.as_deref())?,
            background_color: color("backgroundColor", self.background_color.as_deref())?,
            duration: total,
            text_style: self.text_style.unwrap_or_default(),
            title_position: Position::Center,
            effect: Some(self.effect.unwrap_or(Effect::ZoomIn)),
            transition_in: Transition::Fade,
            transition_out: Transition::Fade,
            text_transition: Some(self.transition.unwrap_or_default()),
            logo: asset_url("logoRef", self.logo_ref.as_deref())?,
        };

        let fade_profile = match self.kind {
            IntroOutroKind::Intro => SoundtrackEffect::FadeIn,
            IntroOutroKind::Outro => SoundtrackEffect::FadeOut,
        };

        Ok(NormalizedVideo {
            kind,
            scenes: vec![scene],
            audio: audio_plan(
                self.music_ref.as_deref(),
                self.music_volume,
                self.voice_ref.as_deref(),
                self.voice_volume,
                fade_profile,
            )?,
            output: OutputTokens {
                aspect_ratio: self.aspect_ratio.clone(),
                resolution: self.resolution.clone(),
                format: self.format.clone(),
                quality: self.quality.clone(),
            },
            insets: InsetProfile::intro_outro(fade_in, fade_out),
        })
    }
}

fn audio_plan(
    music_ref: Option<&str>,
    music_volume: Option<f64>,
    voice_ref: Option<&str>,
    voice_volume: Option<f64>,
    fade: SoundtrackEffect,
) -> TimelineResult<AudioPlan> {
    let music = match asset_url("musicRef", music_ref)? {
        Some(src) => Some(AudioLayer {
            src,
            volume: volume("musicVolume", music_volume, DEFAULT_MUSIC_VOLUME)?,
        }),
        None => None,
    };
    let voice = match asset_url("voiceRef", voice_ref)? {
        Some(src) => Some(AudioLayer {
            src,
            volume: volume("voiceVolume", voice_volume, DEFAULT_VOICE_VOLUME)?,
        }),
        None => None,
    };
    Ok(AudioPlan { music, voice, fade })
}

/// Trim, strip control characters and cap length. Blank becomes `None`.
fn clean_text(input: Option<&str>) -> Option<String> {
    let cleaned: String = input?
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .take(MAX_TEXT_LENGTH)
        .collect();
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn duration(field: &str, secs: Option<f64>, default: Millis) -> TimelineResult<Millis> {
    let Some(secs) = secs else {
        return Ok(default);
    };
    match Millis::from_secs_f64(secs) {
        Some(ms) if ms > MAX_DURATION => Err(too_long(field)),
        Some(ms) if !ms.is_zero() => Ok(ms),
        _ => Err(TimelineError::validation(format!(
            "{} must be a positive number of seconds",
            field
        ))),
    }
}

fn fade(field: &str, secs: Option<f64>, default: Millis) -> TimelineResult<Millis> {
    let Some(secs) = secs else {
        return Ok(default);
    };
    match Millis::from_secs_f64(secs) {
        Some(ms) if ms > MAX_DURATION => Err(too_long(field)),
        Some(ms) => Ok(ms),
        None => Err(TimelineError::validation(format!(
            "{} must be zero or a positive number of seconds",
            field
        ))),
    }
}

fn too_long(field: &str) -> TimelineError {
    TimelineError::validation(format!(
        "{} must be at most {} seconds",
        field,
        MAX_DURATION.as_millis() / 1000
    ))
}

fn volume(field: &str, value: Option<f64>, default: f64) -> TimelineResult<f64> {
    let value = value.unwrap_or(default);
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TimelineError::validation(format!(
            "{} must be between 0 and 1",
            field
        )))
    }
}

/// Absolute http(s) URL. Blank becomes `None`.
fn asset_url(field: &str, input: Option<&str>) -> TimelineResult<Option<String>> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.len() > MAX_URL_LENGTH {
        return Err(TimelineError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_URL_LENGTH
        )));
    }
    let parsed = Url::parse(raw)
        .map_err(|e| TimelineError::validation(format!("{} is not a valid URL: {}", field, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(Some(raw.to_string())),
        _ => Err(TimelineError::validation(format!(
            "{} must be an http or https URL",
            field
        ))),
    }
}

/// `#RGB` or `#RRGGBB`, lowercased. Absent becomes the default colour.
fn color(field: &str, input: Option<&str>) -> TimelineResult<String> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_BACKGROUND_COLOR.to_string());
    };
    let valid = raw
        .strip_prefix('#')
        .filter(|hex| matches!(hex.len(), 3 | 6))
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(raw.to_lowercase())
    } else {
        Err(TimelineError::validation(format!(
            "{} must be a hex colour like #1a2b3c",
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(title: &str) -> SingleTitleRequest {
        SingleTitleRequest {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn scene_input(secs: f64) -> SceneInput {
        SceneInput {
            duration: Some(secs),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_title_defaults() {
        let video = single("Hello World").normalize().unwrap();
        assert_eq!(video.kind, VideoKind::SingleTitle);
        assert_eq!(video.scenes.len(), 1);

        let scene = &video.scenes[0];
        assert_eq!(scene.duration, Millis::from_secs(15));
        assert_eq!(scene.background_color, "#000000");
        assert_eq!(scene.transition_in, Transition::Fade);
        assert_eq!(video.insets, InsetProfile::SINGLE_TITLE);
        assert_eq!(video.audio, AudioPlan::silent(SoundtrackEffect::FadeInFadeOut));
    }

    #[test]
    fn test_single_title_requires_title() {
        let err = SingleTitleRequest::default().normalize().unwrap_err();
        assert_eq!(err, TimelineError::validation("title is required"));

        let err = single("   \t ").normalize().unwrap_err();
        assert_eq!(err, TimelineError::validation("title is required"));
    }

    #[test]
    fn test_single_title_rejects_bad_duration() {
        for bad in [0.0, -3.0, f64::NAN, 3600.001, 1.8446744073709552e16] {
            let mut request = single("Hi");
            request.duration = Some(bad);
            assert!(request.normalize().is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_audio_defaults_and_validation() {
        let mut request = single("Hi");
        request.music_ref = Some("https://cdn.example.com/music.mp3".to_string());
        request.voice_ref = Some("https://cdn.example.com/voice.mp3".to_string());
        let video = request.normalize().unwrap();
        assert_eq!(video.audio.music.as_ref().unwrap().volume, 0.3);
        assert_eq!(video.audio.voice.as_ref().unwrap().volume, 1.0);

        request.music_volume = Some(1.5);
        let err = request.normalize().unwrap_err();
        assert_eq!(err, TimelineError::validation("musicVolume must be between 0 and 1"));
    }

    #[test]
    fn test_asset_urls_validated() {
        let mut request = single("Hi");
        request.background_image = Some("file:///etc/passwd".to_string());
        assert!(request.normalize().is_err());

        request.background_image = Some("not a url".to_string());
        assert!(request.normalize().is_err());

        request.background_image = Some("  ".to_string());
        assert_eq!(request.normalize().unwrap().scenes[0].background_image, None);
    }

    #[test]
    fn test_colors_validated() {
        let mut request = single("Hi");
        request.background_color = Some("#FFF".to_string());
        assert_eq!(request.normalize().unwrap().scenes[0].background_color, "#fff");

        request.background_color = Some("red".to_string());
        assert!(request.normalize().is_err());
    }

    #[test]
    fn test_text_is_cleaned() {
        let video = single("  Hello\u{0007} World  ").normalize().unwrap();
        assert_eq!(video.scenes[0].title.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_scenes_require_non_empty_list() {
        let err = ScenesRequest::default().normalize().unwrap_err();
        assert_eq!(
            err,
            TimelineError::validation("scenes must contain at least one scene")
        );
    }

    #[test]
    fn test_scenes_apply_transition_type() {
        let mut override_scene = scene_input(2.0);
        override_scene.transition_out = Some(Transition::Zoom);
        let request = ScenesRequest {
            scenes: vec![scene_input(5.0), override_scene, SceneInput::default()],
            transition_type: Some(Transition::WipeLeft),
            ..Default::default()
        };
        let video = request.normalize().unwrap();

        assert_eq!(video.scenes[0].transition_in, Transition::WipeLeft);
        assert_eq!(video.scenes[1].transition_out, Transition::Zoom);
        assert_eq!(video.scenes[2].duration, Millis::from_secs(5));
        assert_eq!(video.insets, InsetProfile::SCENES);
    }

    #[test]
    fn test_scene_error_names_index() {
        let request = ScenesRequest {
            scenes: vec![scene_input(5.0), scene_input(-1.0)],
            ..Default::default()
        };
        let err = request.normalize().unwrap_err();
        assert_eq!(
            err,
            TimelineError::validation("scenes[1].duration must be a positive number of seconds")
        );
    }

    #[test]
    fn test_intro_falls_back_to_channel_fields() {
        let request = IntroOutroRequest {
            kind: IntroOutroKind::Intro,
            channel_name: Some("My Channel".to_string()),
            tagline: Some("Weekly videos".to_string()),
            ..Default::default()
        };
        let video = request.normalize().unwrap();
        let scene = &video.scenes[0];

        assert_eq!(video.kind, VideoKind::Intro);
        assert_eq!(scene.title.as_deref(), Some("My Channel"));
        assert_eq!(scene.subtitle.as_deref(), Some("Weekly videos"));
        assert_eq!(scene.duration, Millis::from_secs(5));
        assert_eq!(scene.effect, Some(Effect::ZoomIn));
        assert_eq!(video.audio.fade, SoundtrackEffect::FadeIn);
        assert_eq!(
            video.insets,
            InsetProfile::intro_outro(Millis::from_millis(500), Millis::from_millis(1000))
        );
    }

    #[test]
    fn test_outro_fade_profile() {
        let request = IntroOutroRequest {
            kind: IntroOutroKind::Outro,
            title: Some("Thanks".to_string()),
            ..Default::default()
        };
        assert_eq!(request.normalize().unwrap().audio.fade, SoundtrackEffect::FadeOut);
    }

    #[test]
    fn test_intro_fades_must_fit() {
        // Default fades are 0.5s + 1.0s
        let request = IntroOutroRequest {
            title: Some("Hi".to_string()),
            duration: Some(1.4),
            ..Default::default()
        };
        assert!(request.normalize().is_err());

        let request = IntroOutroRequest {
            title: Some("Hi".to_string()),
            duration: Some(1.5),
            ..Default::default()
        };
        let video = request.normalize().unwrap();
        assert_eq!(video.scenes[0].duration, Millis::from_millis(1500));

        let request = IntroOutroRequest {
            title: None,
            ..Default::default()
        };
        assert_eq!(
            request.normalize().unwrap_err(),
            TimelineError::validation("title or channelName is required")
        );
    }

    #[test]
    fn test_huge_durations_rejected() {
        let request = ScenesRequest {
            scenes: vec![
                SceneInput {
                    duration: Some(1.8446744073709552e16),
                    ..Default::default()
                },
                SceneInput {
                    title: Some("Two".to_string()),
                    duration: Some(5.0),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let err = request.normalize().unwrap_err();
        assert!(err.message().contains("scenes[0].duration"), "{}", err);

        let request = IntroOutroRequest {
            title: Some("Hi".to_string()),
            fade_in: Some(1e300),
            ..Default::default()
        };
        assert!(request.normalize().is_err());
    }
}
