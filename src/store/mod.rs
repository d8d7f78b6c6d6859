// src/store/mod.rs
// Client-local key-value persistence and the Doodle Duel score record

pub mod file;
pub mod memory;
pub mod scores;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use scores::{SCORES_KEY, ScoreRecord, ScoreStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Minimal string store, one value per key. Values are written whole.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
