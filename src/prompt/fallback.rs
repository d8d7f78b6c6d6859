// src/prompt/fallback.rs
// Canned text shown when the gateway can't produce a completion

pub const DOODLE_FALLBACK: &str =
    "AI is taking a creative break! Imagine a wonderfully quirky interpretation here.";

pub const ROAST_FALLBACK: &str =
    "🔥 Oops! The AI is taking a coffee break. But you're probably awesome anyway!";

pub const TOAST_FALLBACK: &str =
    "🎉 Oops! The AI is taking a coffee break. But you're definitely amazing!";

pub const ROLEPLAY_CONTINUATION_FALLBACK: &str =
    "Something unexpected happens... What do you do next?";

pub const ROLEPLAY_CONCLUSION_FALLBACK: &str =
    "And so your adventure comes to a wonderfully chaotic end! Thanks for playing!";

pub const CREATIVITY_FALLBACK: &str = "The AI got distracted by a shiny object and forgot to respond! But I'm sure your idea is brilliant.";

pub const HAIKU_FALLBACK: &str = "Code flows through my mind\nAI dreams in silicon\nCreativity blooms";

/// The opening fallback names the scenario, so it can't be a constant.
pub fn roleplay_opening_fallback(scenario: &str) -> String {
    format!(
        "Welcome to your adventure! {scenario}. The scene is set, and everyone is looking at you expectantly. What do you do first?"
    )
}
