// src/games/doodle_duel.rs
// Doodle Duel: the player draws a random subject while the AI "draws" it in
// words, then the player judges who did better.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::canvas::{Canvas, Point};
use super::{
    Applied, CompletedGeneration, Feature, GameError, GameSession, GenerationGuard,
    PendingCompletion, Phase, accept,
};
use crate::llm::CompletionRequest;
use crate::prompt::{builder, catalog, fallback, pick};
use crate::store::{ScoreRecord, ScoreStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    User,
    Ai,
    Draw,
}

impl std::str::FromStr for Winner {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "me" | "you" => Ok(Winner::User),
            "ai" => Ok(Winner::Ai),
            "draw" | "tie" => Ok(Winner::Draw),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
struct Duel {
    subject: &'static str,
    canvas: Canvas,
    ai_description: Option<String>,
}

#[derive(Debug, Clone)]
enum DuelState {
    Waiting,
    Drawing(Duel),
    Comparing(Duel),
}

/// What the surface renders.
#[derive(Debug, Clone, Serialize)]
pub struct DoodleSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub subject: Option<&'static str>,
    pub canvas: Option<Canvas>,
    pub ai_description: Option<String>,
    pub awaiting_ai: bool,
    pub scores: ScoreRecord,
}

pub struct DoodleDuel {
    state: DuelState,
    guard: GenerationGuard,
    scores: ScoreRecord,
    store: ScoreStore,
}

impl DoodleDuel {
    /// Loads the persisted scores once.
    pub fn new(store: ScoreStore) -> Self {
        let scores = store.load();
        Self {
            state: DuelState::Waiting,
            guard: GenerationGuard::new(),
            scores,
            store,
        }
    }

    pub fn start(&mut self) -> Result<PendingCompletion, GameError> {
        self.start_with_rng(&mut rand::rng())
    }

    /// Pick a subject, hand the player a blank canvas, and ask the AI for its
    /// take on the same subject.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<PendingCompletion, GameError> {
        if !matches!(self.state, DuelState::Waiting) {
            return Err(GameError::invalid(Feature::DoodleDuel, "start", self.phase()));
        }

        let subject = pick(catalog::DRAWING_PROMPTS, rng);
        self.guard.restart();
        self.state = DuelState::Drawing(Duel {
            subject,
            canvas: Canvas::new(),
            ai_description: None,
        });
        info!("{}: session {} drawing '{}'", Feature::DoodleDuel, self.guard.session_id(), subject);

        let request = CompletionRequest::new(builder::doodle_description(subject));
        Ok(PendingCompletion::new(Feature::DoodleDuel, self.guard.issue(), request))
    }

    fn canvas_mut(&mut self, action: &'static str) -> Result<&mut Canvas, GameError> {
        let phase = self.phase();
        match &mut self.state {
            DuelState::Drawing(duel) => Ok(&mut duel.canvas),
            _ => Err(GameError::invalid(Feature::DoodleDuel, action, phase)),
        }
    }

    pub fn pointer_down(&mut self, at: Point) -> Result<(), GameError> {
        self.canvas_mut("draw")?.begin_stroke(at);
        Ok(())
    }

    pub fn pointer_move(&mut self, to: Point) -> Result<(), GameError> {
        self.canvas_mut("draw")?.extend_stroke(to);
        Ok(())
    }

    pub fn pointer_up(&mut self) -> Result<(), GameError> {
        self.canvas_mut("draw")?.end_stroke();
        Ok(())
    }

    pub fn clear_canvas(&mut self) -> Result<(), GameError> {
        self.canvas_mut("clear")?.clear();
        Ok(())
    }

    /// Done drawing. Never waits for the AI; its description may still be
    /// on the way.
    pub fn finish(&mut self) -> Result<(), GameError> {
        match std::mem::replace(&mut self.state, DuelState::Waiting) {
            DuelState::Drawing(mut duel) => {
                duel.canvas.end_stroke();
                self.state = DuelState::Comparing(duel);
                Ok(())
            }
            other => {
                self.state = other;
                Err(GameError::invalid(Feature::DoodleDuel, "finish", self.phase()))
            }
        }
    }

    /// Judge the round, persist the new tally and return to Waiting.
    pub fn vote(&mut self, winner: Winner) -> Result<ScoreRecord, GameError> {
        if !matches!(self.state, DuelState::Comparing(_)) {
            return Err(GameError::invalid(Feature::DoodleDuel, "vote", self.phase()));
        }

        match winner {
            Winner::User => self.scores.user_wins = self.scores.user_wins.saturating_add(1),
            Winner::Ai => self.scores.ai_wins = self.scores.ai_wins.saturating_add(1),
            Winner::Draw => self.scores.draws = self.scores.draws.saturating_add(1),
        }
        if let Err(e) = self.store.save(&self.scores) {
            warn!("{}: failed to persist scores: {}", Feature::DoodleDuel, e);
        }
        info!(
            "{}: {:?} wins (you {} / ai {} / draws {})",
            Feature::DoodleDuel,
            winner,
            self.scores.user_wins,
            self.scores.ai_wins,
            self.scores.draws
        );

        self.state = DuelState::Waiting;
        self.guard.restart();
        Ok(self.scores)
    }

    pub fn scores(&self) -> ScoreRecord {
        self.scores
    }

    pub fn snapshot(&self) -> DoodleSnapshot {
        let duel = match &self.state {
            DuelState::Waiting => None,
            DuelState::Drawing(duel) | DuelState::Comparing(duel) => Some(duel),
        };
        DoodleSnapshot {
            session_id: self.guard.session_id(),
            phase: self.phase(),
            subject: duel.map(|d| d.subject),
            canvas: duel.map(|d| d.canvas.clone()),
            ai_description: duel.and_then(|d| d.ai_description.clone()),
            awaiting_ai: self.is_awaiting(),
            scores: self.scores,
        }
    }
}

impl GameSession for DoodleDuel {
    fn feature(&self) -> Feature {
        Feature::DoodleDuel
    }

    fn phase(&self) -> Phase {
        match self.state {
            DuelState::Waiting => Phase::Waiting,
            DuelState::Drawing(_) => Phase::InProgress,
            DuelState::Comparing(_) => Phase::Resolved,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.guard.is_awaiting()
    }

    fn apply(&mut self, done: CompletedGeneration) -> Applied {
        if !accept(&mut self.guard, Feature::DoodleDuel, &done) {
            return Applied::Stale;
        }
        let text = done.text_or(|| fallback::DOODLE_FALLBACK.to_string());
        match &mut self.state {
            DuelState::Drawing(duel) | DuelState::Comparing(duel) => {
                duel.ai_description = Some(text);
                Applied::Accepted
            }
            DuelState::Waiting => Applied::Stale,
        }
    }

    fn reset(&mut self) {
        self.state = DuelState::Waiting;
        self.guard.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn duel() -> (DoodleDuel, ScoreStore) {
        let store = ScoreStore::new(Arc::new(MemoryStore::new()));
        (DoodleDuel::new(store.clone()), store)
    }

    #[test]
    fn test_start_prompts_for_subject() {
        let (mut game, _) = duel();
        let pending = game.start_with_rng(&mut StdRng::seed_from_u64(1)).unwrap();
        let subject = game.snapshot().subject.unwrap();

        assert_eq!(game.phase(), Phase::InProgress);
        assert!(catalog::DRAWING_PROMPTS.contains(&subject));
        assert!(pending.request().user_prompt.contains(subject));
        assert!(game.is_awaiting());
    }

    #[test]
    fn test_finish_before_ai_replies_then_description_lands() {
        let (mut game, _) = duel();
        let pending = game.start().unwrap();
        game.pointer_down(Point::new(0.0, 0.0)).unwrap();
        game.pointer_move(Point::new(5.0, 5.0)).unwrap();
        game.finish().unwrap();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, Phase::Resolved);
        assert!(snapshot.awaiting_ai);
        assert_eq!(snapshot.canvas.unwrap().point_count(), 2);

        let applied = game.apply(pending.resolve_with(Ok("A toaster with jet wings".into())));
        assert_eq!(applied, Applied::Accepted);
        assert_eq!(
            game.snapshot().ai_description.as_deref(),
            Some("A toaster with jet wings")
        );
    }

    #[test]
    fn test_gateway_failure_uses_fallback() {
        let (mut game, _) = duel();
        let pending = game.start().unwrap();
        game.apply(pending.resolve_with(Err(CompletionError::Service {
            status: 500,
            body: String::new(),
        })));

        assert_eq!(
            game.snapshot().ai_description.as_deref(),
            Some(fallback::DOODLE_FALLBACK)
        );
    }

    #[test]
    fn test_vote_persists_and_returns_to_waiting() {
        let (mut game, store) = duel();
        for winner in [Winner::User, Winner::Ai, Winner::Draw, Winner::User] {
            let pending = game.start().unwrap();
            game.apply(pending.resolve_with(Ok("desc".into())));
            game.finish().unwrap();
            game.vote(winner).unwrap();
            assert_eq!(game.phase(), Phase::Waiting);
        }

        let expected = ScoreRecord { user_wins: 2, ai_wins: 1, draws: 1 };
        assert_eq!(game.scores(), expected);
        assert_eq!(store.load(), expected);
        assert_eq!(DoodleDuel::new(store).scores(), expected);
    }

    #[test]
    fn test_vote_on_maxed_counter_saturates() {
        let store = ScoreStore::new(Arc::new(MemoryStore::new()));
        let maxed = ScoreRecord { user_wins: u64::MAX, ai_wins: 0, draws: 0 };
        store.save(&maxed).unwrap();

        let mut game = DoodleDuel::new(store.clone());
        game.start().unwrap();
        game.finish().unwrap();

        assert_eq!(game.vote(Winner::User).unwrap(), maxed);
        assert_eq!(store.load().total(), u64::MAX);
    }

    #[test]
    fn test_vote_requires_comparing() {
        let (mut game, _) = duel();
        assert!(game.vote(Winner::Ai).is_err());

        game.start().unwrap();
        assert!(matches!(
            game.vote(Winner::Ai),
            Err(GameError::InvalidTransition { phase: Phase::InProgress, .. })
        ));
        assert_eq!(game.scores(), ScoreRecord::default());
    }

    #[test]
    fn test_drawing_only_while_in_progress() {
        let (mut game, _) = duel();
        assert!(game.pointer_down(Point::new(1.0, 1.0)).is_err());

        game.start().unwrap();
        game.pointer_down(Point::new(1.0, 1.0)).unwrap();
        game.clear_canvas().unwrap();
        assert!(game.snapshot().canvas.unwrap().is_blank());

        game.finish().unwrap();
        assert!(game.clear_canvas().is_err());
    }

    #[test]
    fn test_stale_description_after_reset() {
        let (mut game, _) = duel();
        let stale = game.start().unwrap();
        game.reset();
        let fresh = game.start().unwrap();

        assert_eq!(game.apply(stale.resolve_with(Ok("old".into()))), Applied::Stale);
        assert!(game.snapshot().ai_description.is_none());
        assert_eq!(game.apply(fresh.resolve_with(Ok("new".into()))), Applied::Accepted);
        assert_eq!(game.snapshot().ai_description.as_deref(), Some("new"));
    }

    #[test]
    fn test_winner_parsing() {
        assert_eq!("AI".parse::<Winner>(), Ok(Winner::Ai));
        assert_eq!("me".parse::<Winner>(), Ok(Winner::User));
        assert_eq!("tie".parse::<Winner>(), Ok(Winner::Draw));
        assert!("nobody".parse::<Winner>().is_err());
    }
}
