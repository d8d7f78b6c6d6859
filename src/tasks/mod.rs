// src/tasks/mod.rs

//! Background tasks. Currently just the one-second countdown that drives
//! the Creativity Challenge clock.

pub mod countdown;

pub use countdown::{Countdown, spawn_countdown};
