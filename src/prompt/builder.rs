// src/prompt/builder.rs
// User-prompt templates, one per game step

use crate::games::roast_toast::{Intent, Tone};
use crate::games::roleplay::{ConversationTurn, TURN_BUDGET};

const DEFAULT_TARGET: &str = "this person";

pub fn doodle_description(subject: &str) -> String {
    format!(
        "Create a simple, creative description of {subject}. Describe it in vivid detail as if you're drawing it. Keep it under 100 words and make it entertaining."
    )
}

/// Blank or missing names collapse to a generic target.
pub fn roast_toast(tone: Tone, intent: Intent, target: Option<&str>) -> String {
    let target = target
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TARGET);
    let closer = match intent {
        Intent::Roast => "Light teasing only.",
        Intent::Toast => "Make them feel good!",
    };

    format!(
        "Give me a {tone} {intent} message for {target}, no more than 40 words. Be entertaining but not offensive. Make it {}. {closer}",
        tone.descriptor()
    )
}

pub fn roleplay_opening(scenario: &str) -> String {
    format!(
        "You're a creative narrator for a short, silly roleplay game. The scenario is: \"{scenario}\". Start the adventure with an engaging opening scene (2-3 sentences) and ask the player what they do first. Keep it fun and lighthearted."
    )
}

/// Continuation for turns before the last; the final turn asks for an ending.
pub fn roleplay_turn(scenario: &str, transcript: &[ConversationTurn], turn: usize) -> String {
    let history = format_transcript(transcript);
    if turn >= TURN_BUDGET {
        format!(
            "Continue this roleplay story. Scenario: \"{scenario}\". Previous conversation: {history}. This is the final turn (turn {TURN_BUDGET}/{TURN_BUDGET}). Provide an entertaining conclusion to the adventure. Keep it brief and fun."
        )
    } else {
        format!(
            "Continue this roleplay story. Scenario: \"{scenario}\". Previous conversation: {history}. This is turn {turn}/{TURN_BUDGET}. Respond in character as the narrator, describe what happens, and ask what the player does next. Keep it brief and entertaining."
        )
    }
}

pub fn format_transcript(transcript: &[ConversationTurn]) -> String {
    transcript
        .iter()
        .map(|t| format!("{}: {}", t.speaker.label(), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn creativity_response(challenge: &str) -> String {
    format!(
        "Here's a creative challenge: \"{challenge}\". Give me your creative, funny, and original response. Be imaginative and entertaining. Keep it under 150 words."
    )
}

pub fn haiku(inspiration: &str) -> String {
    format!(
        "Write a beautiful 3-line haiku (5-7-5 syllables) inspired by the theme: \"{inspiration}\". Make it poetic, thoughtful, and evocative. Format it as three separate lines."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::roleplay::Speaker;

    #[test]
    fn test_roast_prompt_mentions_everything() {
        let prompt = roast_toast(Tone::Sarcastic, Intent::Roast, Some("Alex"));

        assert!(prompt.contains("sarcastic"));
        assert!(prompt.contains("roast"));
        assert!(prompt.contains("Alex"));
        assert!(prompt.contains("witty and playfully teasing"));
        assert!(prompt.ends_with("Light teasing only."));
    }

    #[test]
    fn test_toast_without_name() {
        let prompt = roast_toast(Tone::Nice, Intent::Toast, Some("   "));

        assert!(prompt.contains("nice toast message for this person"));
        assert!(prompt.contains("uplifting and sweet"));
        assert!(prompt.ends_with("Make them feel good!"));
    }

    #[test]
    fn test_roleplay_turn_variants() {
        let transcript = vec![
            ConversationTurn::new(Speaker::Narrator, "You wake up in a teapot."),
            ConversationTurn::new(Speaker::User, "I climb out"),
        ];

        let middle = roleplay_turn("tea time", &transcript, 1);
        assert!(middle.contains("This is turn 1/3"));
        assert!(middle.contains("ai: You wake up in a teapot.\nuser: I climb out"));

        let last = roleplay_turn("tea time", &transcript, 3);
        assert!(last.contains("final turn (turn 3/3)"));
        assert!(last.contains("conclusion"));
    }

    #[test]
    fn test_haiku_and_creativity_templates() {
        assert!(haiku("rainy day").contains("\"rainy day\""));
        assert!(creativity_response("Invent a fruit").contains("under 150 words"));
        assert!(doodle_description("a fish with legs").contains("a fish with legs"));
    }
}
