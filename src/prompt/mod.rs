// src/prompt/mod.rs
// Prompt templates, curated catalogs and fallback text for the five games

pub mod builder;
pub mod catalog;
pub mod fallback;

pub use catalog::pick;
