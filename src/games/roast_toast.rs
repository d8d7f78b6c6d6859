// src/games/roast_toast.rs
// Roast or Toast: a short teasing or uplifting message in a chosen tone

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{
    Applied, CompletedGeneration, Feature, GameError, GameSession, GenerationGuard,
    PendingCompletion, Phase, accept,
};
use crate::llm::CompletionRequest;
use crate::prompt::{builder, fallback};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Nice,
    Sarcastic,
    Absurd,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Nice, Tone::Sarcastic, Tone::Absurd];

    /// How the prompt asks the model to sound
    pub fn descriptor(&self) -> &'static str {
        match self {
            Tone::Nice => "uplifting and sweet",
            Tone::Sarcastic => "witty and playfully teasing",
            Tone::Absurd => "completely absurd and random",
        }
    }

    /// Reveal effect the surface plays with the result
    pub fn effect(&self) -> &'static str {
        match self {
            Tone::Nice => "sparkles",
            Tone::Sarcastic => "lightning",
            Tone::Absurd => "confetti",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tone::Nice => "nice",
                Tone::Sarcastic => "sarcastic",
                Tone::Absurd => "absurd",
            }
        )
    }
}

impl std::str::FromStr for Tone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nice" => Ok(Tone::Nice),
            "sarcastic" => Ok(Tone::Sarcastic),
            "absurd" => Ok(Tone::Absurd),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Roast,
    Toast,
}

impl Intent {
    pub fn fallback(&self) -> &'static str {
        match self {
            Intent::Roast => fallback::ROAST_FALLBACK,
            Intent::Toast => fallback::TOAST_FALLBACK,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Intent::Roast => "roast",
                Intent::Toast => "toast",
            }
        )
    }
}

#[derive(Debug, Clone)]
enum RoastState {
    Waiting,
    Generating { tone: Tone, intent: Intent },
    Revealed { tone: Tone, intent: Intent, text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RoastSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub tone: Option<Tone>,
    pub intent: Intent,
    pub target_name: String,
    pub result: Option<String>,
    /// Effect of the tone that produced `result`
    pub effect: Option<&'static str>,
    pub awaiting_ai: bool,
    pub can_generate: bool,
}

#[derive(Debug)]
pub struct RoastToast {
    state: RoastState,
    guard: GenerationGuard,
    tone: Option<Tone>,
    intent: Intent,
    target_name: String,
}

impl Default for RoastToast {
    fn default() -> Self {
        Self::new()
    }
}

impl RoastToast {
    pub fn new() -> Self {
        Self {
            state: RoastState::Waiting,
            guard: GenerationGuard::new(),
            tone: None,
            intent: Intent::default(),
            target_name: String::new(),
        }
    }

    pub fn select_tone(&mut self, tone: Tone) {
        self.tone = Some(tone);
    }

    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    /// Name or mood; optional.
    pub fn set_target_name(&mut self, name: impl Into<String>) {
        self.target_name = name.into();
    }

    pub fn can_generate(&self) -> bool {
        self.tone.is_some() && !matches!(self.state, RoastState::Generating { .. })
    }

    /// Ask for a new message. Repeatable; a new result replaces the last one.
    pub fn generate(&mut self) -> Result<PendingCompletion, GameError> {
        let tone = self.tone.ok_or(GameError::ToneNotSelected)?;
        if matches!(self.state, RoastState::Generating { .. }) {
            return Err(GameError::AwaitingReply);
        }

        let intent = self.intent;
        let target = Some(self.target_name.as_str());
        let request = CompletionRequest::new(builder::roast_toast(tone, intent, target));

        self.guard.restart();
        self.state = RoastState::Generating { tone, intent };
        info!("{}: {} {} requested", Feature::RoastToast, tone, intent);

        Ok(PendingCompletion::new(Feature::RoastToast, self.guard.issue(), request))
    }

    pub fn result(&self) -> Option<&str> {
        match &self.state {
            RoastState::Revealed { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> RoastSnapshot {
        let (result, effect) = match &self.state {
            RoastState::Revealed { tone, text, .. } => (Some(text.clone()), Some(tone.effect())),
            _ => (None, None),
        };
        RoastSnapshot {
            session_id: self.guard.session_id(),
            phase: self.phase(),
            tone: self.tone,
            intent: self.intent,
            target_name: self.target_name.clone(),
            result,
            effect,
            awaiting_ai: self.is_awaiting(),
            can_generate: self.can_generate(),
        }
    }
}

impl GameSession for RoastToast {
    fn feature(&self) -> Feature {
        Feature::RoastToast
    }

    fn phase(&self) -> Phase {
        match self.state {
            RoastState::Waiting => Phase::Waiting,
            RoastState::Generating { .. } => Phase::InProgress,
            RoastState::Revealed { .. } => Phase::Resolved,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.guard.is_awaiting()
    }

    fn apply(&mut self, done: CompletedGeneration) -> Applied {
        if !accept(&mut self.guard, Feature::RoastToast, &done) {
            return Applied::Stale;
        }
        let RoastState::Generating { tone, intent } = self.state else {
            return Applied::Stale;
        };
        let text = done.text_or(|| intent.fallback().to_string());
        self.state = RoastState::Revealed { tone, intent, text };
        Applied::Accepted
    }

    /// Clears the result; tone, intent and name stay selected.
    fn reset(&mut self) {
        self.state = RoastState::Waiting;
        self.guard.restart();
    }
}
