// src/llm/provider/scripted.rs
// Scriptable in-process gateway for tests and offline play

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{CompletionError, CompletionGateway, CompletionRequest, CompletionResult};

/// Replays queued results in order, then falls back to a fixed default.
/// Every request is recorded so callers can assert on prompts.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<CompletionResult>>,
    default: CompletionResult,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    /// Answers every call with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_default(Ok(text.into()))
    }

    /// Fails every call with a non-2xx status.
    pub fn failing(status: u16) -> Self {
        Self::with_default(Err(CompletionError::Service {
            status,
            body: "scripted failure".to_string(),
        }))
    }

    pub fn with_default(default: CompletionResult) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-off result, consumed before the default.
    pub fn push(&self, result: CompletionResult) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> CompletionResult {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default.clone())
    }
}
