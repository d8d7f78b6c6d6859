// src/games/creativity.rs
// Creativity Challenge: sixty seconds to answer a silly brief, then compare
// with the AI's answer (requested the moment the challenge starts).

use rand::Rng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{
    Applied, CompletedGeneration, Feature, GameError, GameSession, GenerationGuard,
    PendingCompletion, Phase, accept,
};
use crate::config::DEFAULT_COUNTDOWN_TICKS;
use crate::llm::CompletionRequest;
use crate::prompt::{builder, catalog, fallback, pick};

/// Invariant: `elapsed_ticks <= deadline_ticks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedChallenge {
    pub challenge_text: String,
    pub deadline_ticks: u32,
    pub elapsed_ticks: u32,
}

impl TimedChallenge {
    pub fn remaining(&self) -> u32 {
        self.deadline_ticks - self.elapsed_ticks
    }

    pub fn expired(&self) -> bool {
        self.elapsed_ticks >= self.deadline_ticks
    }
}

/// What ended the challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    EarlySubmit,
    Skip,
    Timeout,
}

/// Input events. Within one frame they are handled in declaration order,
/// so an explicit action beats the timer expiring on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CreativityEvent {
    Submit,
    Skip,
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Relaxed,
    Hurry,
    Critical,
}

impl Urgency {
    pub fn for_remaining(seconds: u32) -> Self {
        if seconds > 30 {
            Urgency::Relaxed
        } else if seconds > 10 {
            Urgency::Hurry
        } else {
            Urgency::Critical
        }
    }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone)]
struct Round {
    challenge: TimedChallenge,
    response: String,
    ai_response: Option<String>,
}

#[derive(Debug, Clone)]
enum ChallengeState {
    Waiting,
    Active(Round),
    Comparing(Round, Resolution),
}

#[derive(Debug, Clone, Serialize)]
pub struct CreativitySnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub challenge: Option<TimedChallenge>,
    pub response: String,
    pub ai_response: Option<String>,
    pub remaining_secs: Option<u32>,
    pub time_left: Option<String>,
    pub urgency: Option<Urgency>,
    pub resolution: Option<Resolution>,
    pub awaiting_ai: bool,
}

#[derive(Debug)]
pub struct CreativityChallenge {
    state: ChallengeState,
    guard: GenerationGuard,
    countdown_ticks: u32,
}

impl Default for CreativityChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl CreativityChallenge {
    pub fn new() -> Self {
        Self::with_countdown(DEFAULT_COUNTDOWN_TICKS)
    }

    /// At least one tick, so a challenge is never born expired.
    pub fn with_countdown(ticks: u32) -> Self {
        Self {
            state: ChallengeState::Waiting,
            guard: GenerationGuard::new(),
            countdown_ticks: ticks.max(1),
        }
    }

    pub fn start(&mut self) -> Result<PendingCompletion, GameError> {
        self.start_with_rng(&mut rand::rng())
    }

    /// Draw a challenge, start the clock, and ask the AI for its answer now
    /// rather than after the player finishes.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<PendingCompletion, GameError> {
        if !matches!(self.state, ChallengeState::Waiting) {
            return Err(GameError::invalid(Feature::Creativity, "start", self.phase()));
        }

        let text = pick(catalog::CREATIVE_CHALLENGES, rng);
        self.guard.restart();
        self.state = ChallengeState::Active(Round {
            challenge: TimedChallenge {
                challenge_text: text.to_string(),
                deadline_ticks: self.countdown_ticks,
                elapsed_ticks: 0,
            },
            response: String::new(),
            ai_response: None,
        });
        info!("{}: session {} '{}'", Feature::Creativity, self.guard.session_id(), text);

        let request = CompletionRequest::new(builder::creativity_response(text));
        Ok(PendingCompletion::new(Feature::Creativity, self.guard.issue(), request))
    }

    /// Replace the player's draft. Only while the clock is running.
    pub fn set_response(&mut self, text: impl Into<String>) -> Result<(), GameError> {
        let phase = self.phase();
        match &mut self.state {
            ChallengeState::Active(round) => {
                round.response = text.into();
                Ok(())
            }
            _ => Err(GameError::invalid(Feature::Creativity, "edit", phase)),
        }
    }

    pub fn submit_early(&mut self) -> Result<Resolution, GameError> {
        let ChallengeState::Active(round) = &self.state else {
            return Err(GameError::invalid(Feature::Creativity, "submit", self.phase()));
        };
        if round.response.trim().is_empty() {
            return Err(GameError::EmptyInput);
        }
        Ok(self.resolve(Resolution::EarlySubmit))
    }

    pub fn skip(&mut self) -> Result<Resolution, GameError> {
        if !matches!(self.state, ChallengeState::Active(_)) {
            return Err(GameError::invalid(Feature::Creativity, "skip", self.phase()));
        }
        Ok(self.resolve(Resolution::Skip))
    }

    /// One second passes. Returns the resolution if this tick ran the clock
    /// out; ticks outside an active challenge are ignored.
    pub fn tick(&mut self) -> Option<Resolution> {
        let ChallengeState::Active(round) = &mut self.state else {
            return None;
        };
        round.challenge.elapsed_ticks += 1;
        if round.challenge.expired() {
            Some(self.resolve(Resolution::Timeout))
        } else {
            None
        }
    }

    /// Handle everything that arrived in one frame, explicit actions first.
    /// Returns the resolution if one happened during the frame.
    pub fn process_frame(&mut self, events: &[CreativityEvent]) -> Option<Resolution> {
        let mut ordered = events.to_vec();
        ordered.sort();

        for event in ordered {
            if !matches!(self.state, ChallengeState::Active(_)) {
                break;
            }
            let resolved = match event {
                CreativityEvent::Submit => self.submit_early().ok(),
                CreativityEvent::Skip => self.skip().ok(),
                CreativityEvent::Tick => self.tick(),
            };
            if resolved.is_some() {
                return resolved;
            }
        }
        None
    }

    fn resolve(&mut self, resolution: Resolution) -> Resolution {
        if let ChallengeState::Active(round) =
            std::mem::replace(&mut self.state, ChallengeState::Waiting)
        {
            info!(
                "{}: resolved by {:?} with {}s left",
                Feature::Creativity,
                resolution,
                round.challenge.remaining()
            );
            self.state = ChallengeState::Comparing(round, resolution);
        }
        resolution
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match &self.state {
            ChallengeState::Comparing(_, resolution) => Some(*resolution),
            _ => None,
        }
    }

    pub fn challenge(&self) -> Option<&TimedChallenge> {
        match &self.state {
            ChallengeState::Waiting => None,
            ChallengeState::Active(r) | ChallengeState::Comparing(r, _) => Some(&r.challenge),
        }
    }

    pub fn snapshot(&self) -> CreativitySnapshot {
        let round = match &self.state {
            ChallengeState::Waiting => None,
            ChallengeState::Active(r) | ChallengeState::Comparing(r, _) => Some(r),
        };
        let remaining = round.map(|r| r.challenge.remaining());
        CreativitySnapshot {
            session_id: self.guard.session_id(),
            phase: self.phase(),
            challenge: round.map(|r| r.challenge.clone()),
            response: round.map(|r| r.response.clone()).unwrap_or_default(),
            ai_response: round.and_then(|r| r.ai_response.clone()),
            remaining_secs: remaining,
            time_left: remaining.map(format_time),
            urgency: remaining.map(Urgency::for_remaining),
            resolution: self.resolution(),
            awaiting_ai: self.is_awaiting(),
        }
    }
}

impl GameSession for CreativityChallenge {
    fn feature(&self) -> Feature {
        Feature::Creativity
    }

    fn phase(&self) -> Phase {
        match self.state {
            ChallengeState::Waiting => Phase::Waiting,
            ChallengeState::Active(_) => Phase::InProgress,
            ChallengeState::Comparing(..) => Phase::Resolved,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.guard.is_awaiting()
    }

    fn apply(&mut self, done: CompletedGeneration) -> Applied {
        if !accept(&mut self.guard, Feature::Creativity, &done) {
            return Applied::Stale;
        }
        let text = done.text_or(|| fallback::CREATIVITY_FALLBACK.to_string());
        match &mut self.state {
            ChallengeState::Active(round) | ChallengeState::Comparing(round, _) => {
                round.ai_response = Some(text);
                Applied::Accepted
            }
            ChallengeState::Waiting => Applied::Stale,
        }
    }

    fn reset(&mut self) {
        self.state = ChallengeState::Waiting;
        self.guard.restart();
    }
}
