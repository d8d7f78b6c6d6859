// src/persona/mod.rs
// System message every game speaks with

pub mod default;

pub use default::DEFAULT_SYSTEM_MESSAGE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_sets_the_tone() {
        assert!(DEFAULT_SYSTEM_MESSAGE.contains("boredom-busting"));
        assert!(DEFAULT_SYSTEM_MESSAGE.contains("concise"));
    }
}
