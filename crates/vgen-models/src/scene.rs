//! Normalized scene, the compiler's unit of input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::style::{Effect, Position, TextStyle, Transition};
use crate::time::Millis;

/// Default background colour when a caller supplies none.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#000000";

/// One visual beat: a background with optional title and subtitle.
///
/// Every field is resolved; a `Scene` only exists after request
/// normalization has validated the caller input and applied defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
    pub background_color: String,
    /// Always > 0
    pub duration: Millis,
    pub text_style: TextStyle,
    pub title_position: Position,
    pub effect: Option<Effect>,
    pub transition_in: Transition,
    pub transition_out: Transition,
    /// When set, title and subtitle clips enter and exit with this instead
    /// of the scene transitions
    pub text_transition: Option<Transition>,
    /// Logo overlay shown for the whole scene (intro/outro cards)
    pub logo: Option<String>,
}

impl Scene {
    /// A plain scene of the given length with every optional part empty.
    pub fn new(duration: Millis) -> Self {
        Self {
            title: None,
            subtitle: None,
            background_image: None,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            duration,
            text_style: TextStyle::default(),
            title_position: Position::default(),
            effect: None,
            transition_in: Transition::default(),
            transition_out: Transition::default(),
            text_transition: None,
            logo: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_transitions(mut self, incoming: Transition, outgoing: Transition) -> Self {
        self.transition_in = incoming;
        self.transition_out = outgoing;
        self
    }
}
