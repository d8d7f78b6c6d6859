// src/lib.rs

pub mod config;
pub mod games;
pub mod llm;
pub mod persona;
pub mod prompt;
pub mod store;
pub mod tasks;
