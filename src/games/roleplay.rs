// src/games/roleplay.rs
// Roleplay Adventure: an opening scene plus exactly three player turns, the
// last of which the narrator wraps up.

use rand::Rng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{
    Applied, CompletedGeneration, Feature, GameError, GameSession, GenerationGuard,
    PendingCompletion, Phase, accept,
};
use crate::llm::CompletionRequest;
use crate::prompt::{builder, catalog, fallback, pick};

/// Player turns per adventure
pub const TURN_BUDGET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Narrator,
}

impl Speaker {
    /// Label used when the transcript is replayed to the model
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Narrator => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Adventure {
    scenario: &'static str,
    transcript: Vec<ConversationTurn>,
}

impl Adventure {
    fn user_turns(&self) -> usize {
        self.transcript
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .count()
    }
}

#[derive(Debug, Clone)]
enum AdventureState {
    Waiting,
    Playing(Adventure),
    Finished(Adventure),
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleplaySnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub scenario: Option<&'static str>,
    pub transcript: Vec<ConversationTurn>,
    pub turn: usize,
    pub turn_budget: usize,
    pub awaiting_ai: bool,
}

#[derive(Debug)]
pub struct RoleplayAdventure {
    state: AdventureState,
    guard: GenerationGuard,
}

impl Default for RoleplayAdventure {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleplayAdventure {
    pub fn new() -> Self {
        Self {
            state: AdventureState::Waiting,
            guard: GenerationGuard::new(),
        }
    }

    pub fn start(&mut self) -> Result<PendingCompletion, GameError> {
        self.start_with_rng(&mut rand::rng())
    }

    /// Cast the player into a random scenario and request the opening scene.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<PendingCompletion, GameError> {
        if !matches!(self.state, AdventureState::Waiting) {
            return Err(GameError::invalid(Feature::Roleplay, "start", self.phase()));
        }

        let scenario = pick(catalog::ROLEPLAY_SCENARIOS, rng);
        self.guard.restart();
        self.state = AdventureState::Playing(Adventure {
            scenario,
            transcript: Vec::new(),
        });
        info!("{}: session {} as '{}'", Feature::Roleplay, self.guard.session_id(), scenario);

        let request = CompletionRequest::new(builder::roleplay_opening(scenario));
        Ok(PendingCompletion::new(Feature::Roleplay, self.guard.issue(), request))
    }

    /// Append the player's action and ask the narrator to respond. The third
    /// action ends the adventure immediately; the conclusion arrives later.
    pub fn submit(&mut self, action: &str) -> Result<PendingCompletion, GameError> {
        let action = action.trim();
        let phase = self.phase();
        let awaiting = self.guard.is_awaiting();

        let adventure = match &mut self.state {
            AdventureState::Playing(a) => a,
            AdventureState::Finished(_) => return Err(GameError::TurnBudgetExhausted(TURN_BUDGET)),
            AdventureState::Waiting => {
                return Err(GameError::invalid(Feature::Roleplay, "submit", phase));
            }
        };
        if awaiting {
            return Err(GameError::AwaitingReply);
        }
        if action.is_empty() {
            return Err(GameError::EmptyInput);
        }

        adventure
            .transcript
            .push(ConversationTurn::new(Speaker::User, action));
        let turn = adventure.user_turns();
        let request = CompletionRequest::new(builder::roleplay_turn(
            adventure.scenario,
            &adventure.transcript,
            turn,
        ));

        if turn >= TURN_BUDGET {
            if let AdventureState::Playing(adventure) =
                std::mem::replace(&mut self.state, AdventureState::Waiting)
            {
                self.state = AdventureState::Finished(adventure);
            }
            info!("{}: final turn submitted", Feature::Roleplay);
        }

        Ok(PendingCompletion::new(Feature::Roleplay, self.guard.issue(), request))
    }

    /// Player turns taken so far.
    pub fn turn(&self) -> usize {
        match &self.state {
            AdventureState::Waiting => 0,
            AdventureState::Playing(a) | AdventureState::Finished(a) => a.user_turns(),
        }
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        match &self.state {
            AdventureState::Waiting => &[],
            AdventureState::Playing(a) | AdventureState::Finished(a) => &a.transcript,
        }
    }

    pub fn snapshot(&self) -> RoleplaySnapshot {
        let scenario = match &self.state {
            AdventureState::Waiting => None,
            AdventureState::Playing(a) | AdventureState::Finished(a) => Some(a.scenario),
        };
        RoleplaySnapshot {
            session_id: self.guard.session_id(),
            phase: self.phase(),
            scenario,
            transcript: self.transcript().to_vec(),
            turn: self.turn(),
            turn_budget: TURN_BUDGET,
            awaiting_ai: self.is_awaiting(),
        }
    }
}

impl GameSession for RoleplayAdventure {
    fn feature(&self) -> Feature {
        Feature::Roleplay
    }

    fn phase(&self) -> Phase {
        match self.state {
            AdventureState::Waiting => Phase::Waiting,
            AdventureState::Playing(_) => Phase::InProgress,
            AdventureState::Finished(_) => Phase::Resolved,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.guard.is_awaiting()
    }

    fn apply(&mut self, done: CompletedGeneration) -> Applied {
        if !accept(&mut self.guard, Feature::Roleplay, &done) {
            return Applied::Stale;
        }
        let adventure = match &mut self.state {
            AdventureState::Playing(a) | AdventureState::Finished(a) => a,
            AdventureState::Waiting => return Applied::Stale,
        };

        let turn = adventure.user_turns();
        let scenario = adventure.scenario;
        let reply = done.text_or(|| match turn {
            0 => fallback::roleplay_opening_fallback(scenario),
            t if t >= TURN_BUDGET => fallback::ROLEPLAY_CONCLUSION_FALLBACK.to_string(),
            _ => fallback::ROLEPLAY_CONTINUATION_FALLBACK.to_string(),
        });
        adventure
            .transcript
            .push(ConversationTurn::new(Speaker::Narrator, reply));
        Applied::Accepted
    }

    fn reset(&mut self) {
        self.state = AdventureState::Waiting;
        self.guard.restart();
    }
}
