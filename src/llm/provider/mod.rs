// src/llm/provider/mod.rs
// Completion gateway trait and the request/result types shared by every game

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BusterConfig, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::persona::DEFAULT_SYSTEM_MESSAGE;

pub mod deepseek;
pub mod scripted;

pub use deepseek::DeepSeekGateway;
pub use scripted::ScriptedGateway;

/// Message format sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// One single-turn completion. Built per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_message: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    /// Request with the default system message and sampling settings.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            user_prompt: user_prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    /// Apply the sampling settings from config.
    pub fn tuned(mut self, config: &BusterConfig) -> Self {
        self.max_tokens = config.max_tokens;
        self.temperature = config.temperature;
        self
    }

    /// Ordered `system`, `user` pair.
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                role: "system".to_string(),
                content: self.system_message.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: self.user_prompt.clone(),
            },
        ]
    }
}

/// Why a completion could not be produced. Callers treat every variant the
/// same way (fallback text); the distinction only matters for logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type CompletionResult = Result<String, CompletionError>;

/// The narrow interface every game talks to.
///
/// One call is one network round trip: no retry, no caching. Implementations
/// must never panic on provider failure; they return a `CompletionError`.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Gateway name for logging/debugging
    fn name(&self) -> &'static str;

    async fn complete(&self, request: CompletionRequest) -> CompletionResult;
}
