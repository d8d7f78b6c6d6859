// src/games/mod.rs
// Shared machinery for the five game state machines.
//
// Every game follows the same shape: Waiting -> InProgress -> Resolved, with
// an explicit reset back to Waiting. Gateway calls never run while a game is
// borrowed; a transition hands back a `PendingCompletion`, the caller awaits
// it, and feeds the `CompletedGeneration` back through `GameSession::apply`.
// Tickets tie each result to the session that asked for it, so a result that
// lands after a reset or a newer request is dropped.

pub mod canvas;
pub mod creativity;
pub mod doodle_duel;
pub mod haiku;
pub mod roast_toast;
pub mod roleplay;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::BusterConfig;
use crate::llm::{CompletionGateway, CompletionRequest, CompletionResult};

pub use creativity::CreativityChallenge;
pub use doodle_duel::DoodleDuel;
pub use haiku::HaikuGenerator;
pub use roast_toast::RoastToast;
pub use roleplay::RoleplayAdventure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    DoodleDuel,
    RoastToast,
    Roleplay,
    Creativity,
    Haiku,
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Feature::DoodleDuel => "doodle-duel",
                Feature::RoastToast => "roast-toast",
                Feature::Roleplay => "roleplay",
                Feature::Creativity => "creativity",
                Feature::Haiku => "haiku",
            }
        )
    }
}

/// Coarse phase every game reports, whatever its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    InProgress,
    Resolved,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Phase::Waiting => "waiting",
                Phase::InProgress => "in progress",
                Phase::Resolved => "resolved",
            }
        )
    }
}

/// Caller-contract violations. Game state is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("{feature}: cannot {action} while {phase}")]
    InvalidTransition {
        feature: Feature,
        action: &'static str,
        phase: Phase,
    },

    #[error("pick a tone first")]
    ToneNotSelected,

    #[error("input is empty")]
    EmptyInput,

    #[error("all {0} turns have been played")]
    TurnBudgetExhausted(usize),

    #[error("still waiting for the previous AI reply")]
    AwaitingReply,

    #[error("a custom theme is required")]
    MissingTheme,
}

impl GameError {
    pub(crate) fn invalid(feature: Feature, action: &'static str, phase: Phase) -> Self {
        GameError::InvalidTransition {
            feature,
            action,
            phase,
        }
    }
}

/// Identity of one outstanding gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket {
    session: Uuid,
    seq: u64,
}

impl Ticket {
    pub fn session(&self) -> Uuid {
        self.session
    }
}

/// Tracks the current session identity and the one call whose result the
/// session will still accept.
#[derive(Debug)]
pub struct GenerationGuard {
    session: Uuid,
    next_seq: u64,
    outstanding: Option<Ticket>,
}

impl Default for GenerationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
            next_seq: 0,
            outstanding: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// New session identity. Anything still in flight becomes stale.
    pub fn restart(&mut self) -> Uuid {
        self.session = Uuid::new_v4();
        self.outstanding = None;
        self.session
    }

    /// Issue a ticket; it supersedes any earlier outstanding one.
    pub fn issue(&mut self) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket {
            session: self.session,
            seq: self.next_seq,
        };
        self.outstanding = Some(ticket);
        ticket
    }

    /// True exactly once for the outstanding ticket.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.outstanding == Some(ticket) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.outstanding.is_some()
    }
}

/// A gateway call a transition asked for but hasn't made yet.
#[derive(Debug, Clone)]
pub struct PendingCompletion {
    feature: Feature,
    ticket: Ticket,
    request: CompletionRequest,
}

impl PendingCompletion {
    pub(crate) fn new(feature: Feature, ticket: Ticket, request: CompletionRequest) -> Self {
        Self {
            feature,
            ticket,
            request,
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    /// Apply sampling settings from config before running.
    pub fn tuned(mut self, config: &BusterConfig) -> Self {
        self.request = self.request.tuned(config);
        self
    }

    /// One round trip through the gateway.
    pub async fn run(self, gateway: &dyn CompletionGateway) -> CompletedGeneration {
        debug!("{} -> {} ({:?})", self.feature, gateway.name(), self.ticket);
        let outcome = gateway.complete(self.request).await;
        CompletedGeneration {
            feature: self.feature,
            ticket: self.ticket,
            outcome,
        }
    }

    /// Settle without a gateway, e.g. when a surface replays a cached result.
    pub fn resolve_with(self, outcome: CompletionResult) -> CompletedGeneration {
        CompletedGeneration {
            feature: self.feature,
            ticket: self.ticket,
            outcome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletedGeneration {
    feature: Feature,
    ticket: Ticket,
    outcome: CompletionResult,
}

impl CompletedGeneration {
    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn outcome(&self) -> &CompletionResult {
        &self.outcome
    }

    /// Generated text, or the feature's fallback when the gateway failed.
    pub(crate) fn text_or(self, fallback: impl FnOnce() -> String) -> String {
        match self.outcome {
            Ok(text) => text,
            Err(e) => {
                warn!("{}: generation unavailable ({}), using fallback text", self.feature, e);
                fallback()
            }
        }
    }
}

/// Whether a completed generation changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    Stale,
}

/// Common surface of all five games.
pub trait GameSession {
    fn feature(&self) -> Feature;

    fn phase(&self) -> Phase;

    /// A gateway result is still expected.
    fn is_awaiting(&self) -> bool;

    /// Feed a finished gateway call back in. Results for an older session or
    /// a superseded request are ignored.
    fn apply(&mut self, done: CompletedGeneration) -> Applied;

    /// Back to Waiting, dropping the session payload.
    fn reset(&mut self);
}

/// Shared ticket check used by every `apply`.
pub(crate) fn accept(guard: &mut GenerationGuard, feature: Feature, done: &CompletedGeneration) -> bool {
    if done.feature != feature || !guard.settle(done.ticket) {
        warn!(
            "{}: discarding stale result for {:?} (session now {})",
            feature,
            done.ticket,
            guard.session_id()
        );
        return false;
    }
    true
}

/// Run a pending call and apply it in one go. Convenient when nothing else
/// needs to happen while the call is in flight.
pub async fn drive<G: GameSession>(
    game: &mut G,
    pending: PendingCompletion,
    gateway: &dyn CompletionGateway,
) -> Applied {
    let done = pending.run(gateway).await;
    game.apply(done)
}
