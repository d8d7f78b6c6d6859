// src/prompt/catalog.rs
// Curated scenario sets each game draws from at `start`

use rand::Rng;
use rand::seq::IndexedRandom;

/// Things to draw in a Doodle Duel
pub const DRAWING_PROMPTS: &[&str] = &[
    "a futuristic toaster",
    "a cat wearing a business suit",
    "a tree made of candy",
    "a robot doing yoga",
    "a pizza slice surfing",
    "a dragon reading a book",
    "a house on wheels",
    "a fish with legs",
    "a cloud with sunglasses",
    "a dancing cactus",
];

/// Roles handed to the player in a Roleplay Adventure
pub const ROLEPLAY_SCENARIOS: &[&str] = &[
    "You're a grumpy cactus running for mayor in a human town",
    "You're a space cat detective solving a chocolate theft on Mars",
    "You're a time-traveling barista who accidentally served coffee to dinosaurs",
    "You're a superhero whose only power is making really good sandwiches",
    "You're a dragon who's terrible at being scary and just wants to make friends",
    "You're a robot butler in a haunted mansion where the ghosts are surprisingly polite",
    "You're a pirate captain whose crew consists entirely of rubber ducks",
    "You're a wizard who can only cast spells that make things slightly more convenient",
    "You're a vampire who's allergic to blood and has to find alternative food sources",
    "You're an alien anthropologist studying human behavior at a shopping mall",
];

/// Sixty-second creativity challenges
pub const CREATIVE_CHALLENGES: &[&str] = &[
    "Invent a new fruit with unexpected side effects",
    "Design a T-shirt slogan for introverts",
    "Create a superhero whose power is completely useless",
    "Describe a restaurant that serves only foods that start with the same letter",
    "Invent a new holiday and explain how people celebrate it",
    "Design a product that solves a problem that doesn't exist",
    "Create a dating app for inanimate objects",
    "Describe a world where gravity works backwards on Tuesdays",
    "Invent a new sport that can only be played in elevators",
    "Design a theme park based on everyday chores",
    "Create a social media platform for time travelers",
    "Describe a job interview for becoming a professional cloud watcher",
];

/// Uniform pick from a non-empty catalog.
pub fn pick<R: Rng + ?Sized>(catalog: &'static [&'static str], rng: &mut R) -> &'static str {
    catalog.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(DRAWING_PROMPTS.len(), 10);
        assert_eq!(ROLEPLAY_SCENARIOS.len(), 10);
        assert_eq!(CREATIVE_CHALLENGES.len(), 12);
    }

    #[test]
    fn test_pick_covers_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<&str> = (0..500).map(|_| pick(DRAWING_PROMPTS, &mut rng)).collect();

        assert_eq!(seen.len(), DRAWING_PROMPTS.len(), "uniform pick should reach every entry");
    }

    #[test]
    fn test_pick_from_empty_catalog_is_blank() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick(&[], &mut rng), "");
    }
}
