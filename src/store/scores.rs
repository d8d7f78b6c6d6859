// src/store/scores.rs
// Doodle Duel win/loss/draw counters

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{KeyValueStore, StoreError};

/// Fixed key the record lives under
pub const SCORES_KEY: &str = "doodleDuelScores";

/// Counters only ever go up. Unsigned fields make negatives unrepresentable;
/// a stored negative fails to parse and loads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "user")]
    pub user_wins: u64,
    #[serde(rename = "ai")]
    pub ai_wins: u64,
    pub draws: u64,
}

impl ScoreRecord {
    /// Saturates rather than wrapping on absurdly large loaded records.
    pub fn total(&self) -> u64 {
        self.user_wins
            .saturating_add(self.ai_wins)
            .saturating_add(self.draws)
    }
}

#[derive(Clone)]
pub struct ScoreStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ScoreStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Never fails: a missing or unreadable record is a fresh one.
    pub fn load(&self) -> ScoreRecord {
        match self.backend.get(SCORES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unparseable score record: {}", e);
                ScoreRecord::default()
            }),
            Ok(None) => ScoreRecord::default(),
            Err(e) => {
                warn!("Failed to read score record: {}", e);
                ScoreRecord::default()
            }
        }
    }

    /// Overwrites the whole record.
    pub fn save(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        let raw = serde_json::to_string(record)?;
        self.backend.put(SCORES_KEY, &raw)
    }
}
