// src/games/haiku.rs
// Haiku Generator: a 5-7-5 poem from the current title or a custom theme

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{
    Applied, CompletedGeneration, Feature, GameError, GameSession, GenerationGuard,
    PendingCompletion, Phase, accept,
};
use crate::llm::CompletionRequest;
use crate::prompt::{builder, fallback};

/// Used when the ambient title is blank.
pub const DEFAULT_INSPIRATION: &str = "life";

/// Where the haiku's theme comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InspirationSource {
    /// Whatever the surface is showing, e.g. a page or window title.
    #[default]
    AmbientTitle,
    CustomTheme,
}

#[derive(Debug, Clone)]
enum HaikuState {
    Waiting,
    Composing { inspiration: String },
    Done { inspiration: String, haiku: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct HaikuSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub source: InspirationSource,
    pub ambient_title: String,
    pub custom_theme: String,
    pub inspiration: Option<String>,
    pub haiku: Option<String>,
    pub awaiting_ai: bool,
}

#[derive(Debug)]
pub struct HaikuGenerator {
    state: HaikuState,
    guard: GenerationGuard,
    source: InspirationSource,
    ambient_title: String,
    custom_theme: String,
}

impl Default for HaikuGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HaikuGenerator {
    pub fn new() -> Self {
        Self {
            state: HaikuState::Waiting,
            guard: GenerationGuard::new(),
            source: InspirationSource::default(),
            ambient_title: String::new(),
            custom_theme: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.ambient_title = title.into();
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.custom_theme = theme.into();
    }

    pub fn use_title(&mut self) {
        self.source = InspirationSource::AmbientTitle;
    }

    pub fn use_theme(&mut self) {
        self.source = InspirationSource::CustomTheme;
    }

    pub fn source(&self) -> InspirationSource {
        self.source
    }

    /// The theme a generate call would use right now.
    pub fn inspiration(&self) -> Result<String, GameError> {
        match self.source {
            InspirationSource::AmbientTitle => {
                let title = self.ambient_title.trim();
                Ok(if title.is_empty() {
                    DEFAULT_INSPIRATION.to_string()
                } else {
                    title.to_string()
                })
            }
            InspirationSource::CustomTheme => {
                let theme = self.custom_theme.trim();
                if theme.is_empty() {
                    Err(GameError::MissingTheme)
                } else {
                    Ok(theme.to_string())
                }
            }
        }
    }

    /// Compose a haiku. Repeatable; the previous poem is cleared at once.
    pub fn generate(&mut self) -> Result<PendingCompletion, GameError> {
        if matches!(self.state, HaikuState::Composing { .. }) {
            return Err(GameError::AwaitingReply);
        }
        let inspiration = self.inspiration()?;
        let request = CompletionRequest::new(builder::haiku(&inspiration));

        self.guard.restart();
        info!("{}: composing on '{}'", Feature::Haiku, inspiration);
        self.state = HaikuState::Composing { inspiration };

        Ok(PendingCompletion::new(Feature::Haiku, self.guard.issue(), request))
    }

    pub fn haiku(&self) -> Option<&str> {
        match &self.state {
            HaikuState::Done { haiku, .. } => Some(haiku),
            _ => None,
        }
    }

    /// Non-empty, trimmed lines of the current poem.
    pub fn lines(&self) -> Vec<&str> {
        self.haiku()
            .map(|h| h.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> HaikuSnapshot {
        let (inspiration, haiku) = match &self.state {
            HaikuState::Waiting => (None, None),
            HaikuState::Composing { inspiration } => (Some(inspiration.clone()), None),
            HaikuState::Done { inspiration, haiku } => {
                (Some(inspiration.clone()), Some(haiku.clone()))
            }
        };
        HaikuSnapshot {
            session_id: self.guard.session_id(),
            phase: self.phase(),
            source: self.source,
            ambient_title: self.ambient_title.clone(),
            custom_theme: self.custom_theme.clone(),
            inspiration,
            haiku,
            awaiting_ai: self.is_awaiting(),
        }
    }
}

impl GameSession for HaikuGenerator {
    fn feature(&self) -> Feature {
        Feature::Haiku
    }

    fn phase(&self) -> Phase {
        match self.state {
            HaikuState::Waiting => Phase::Waiting,
            HaikuState::Composing { .. } => Phase::InProgress,
            HaikuState::Done { .. } => Phase::Resolved,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.guard.is_awaiting()
    }

    fn apply(&mut self, done: CompletedGeneration) -> Applied {
        if !accept(&mut self.guard, Feature::Haiku, &done) {
            return Applied::Stale;
        }
        let HaikuState::Composing { inspiration } =
            std::mem::replace(&mut self.state, HaikuState::Waiting)
        else {
            return Applied::Stale;
        };
        let haiku = done.text_or(|| fallback::HAIKU_FALLBACK.to_string());
        self.state = HaikuState::Done { inspiration, haiku };
        Applied::Accepted
    }

    /// Drops the poem; title, theme and source stay.
    fn reset(&mut self) {
        self.state = HaikuState::Waiting;
        self.guard.restart();
    }
}
