// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod provider;

pub use provider::{
    CompletionError, CompletionGateway, CompletionRequest, CompletionResult, DeepSeekGateway,
    ScriptedGateway,
};
