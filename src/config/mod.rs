// src/config/mod.rs
// Runtime configuration, loaded from .env and the process environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_COUNTDOWN_TICKS: u32 = 60;

#[derive(Debug, Clone, Serialize)]
pub struct BusterConfig {
    // ── Chat completion provider
    pub api_base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout_secs: u64,

    // ── Games
    pub countdown_ticks: u32,

    // ── Storage
    pub data_dir: PathBuf,

    // ── Logging
    pub log_level: String,
}

impl Default for BusterConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parses a raw value, tolerating trailing `# comments` and whitespace.
/// Falls back to `default` when the key is missing or does not parse.
fn value_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            if clean_val.is_empty() {
                return default;
            }
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        None => default,
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("boredom-buster"))
        .unwrap_or_else(|| PathBuf::from(".boredom-buster"))
}

impl BusterConfig {
    /// Load `.env` (if present) and then read the process environment.
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            // Not an error: plain environment variables still apply.
            tracing::debug!(".env file not found, using environment variables and defaults");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Tests use this instead of touching
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DEEPSEEK_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            api_base_url: value_or(&lookup, "BUSTER_API_BASE_URL", DEFAULT_API_BASE_URL.to_string()),
            model: value_or(&lookup, "BUSTER_MODEL", DEFAULT_MODEL.to_string()),
            api_key,
            max_tokens: value_or(&lookup, "BUSTER_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature: value_or(&lookup, "BUSTER_TEMPERATURE", DEFAULT_TEMPERATURE),
            request_timeout_secs: value_or(&lookup, "BUSTER_REQUEST_TIMEOUT", 30),
            countdown_ticks: value_or(&lookup, "BUSTER_COUNTDOWN_SECS", DEFAULT_COUNTDOWN_TICKS),
            data_dir: lookup("BUSTER_DATA_DIR")
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            log_level: value_or(&lookup, "BUSTER_LOG_LEVEL", "info".to_string()),
        }
    }

    // --- Convenience Methods ---

    /// Full chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// One countdown tick per second.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// Parsed log level, `INFO` when unrecognised.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// Human-readable summary. Never includes the key itself.
    pub fn summary(&self) -> String {
        format!(
            "model={} endpoint={} key={} max_tokens={} temperature={} countdown={}s data_dir={}",
            self.model,
            self.chat_completions_url(),
            if self.has_api_key() { "set" } else { "MISSING" },
            self.max_tokens,
            self.temperature,
            self.countdown_ticks,
            self.data_dir.display(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = BusterConfig::from_lookup(|_| None);

        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.countdown_ticks, 60);
        assert!(!config.has_api_key());
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_overrides_and_comments() {
        let config = BusterConfig::from_lookup(lookup_from(&[
            ("BUSTER_MAX_TOKENS", "250   # shorter answers"),
            ("BUSTER_TEMPERATURE", "0.2"),
            ("BUSTER_MODEL", "deepseek-reasoner"),
            ("BUSTER_LOG_LEVEL", "debug"),
        ]));

        assert_eq!(config.max_tokens, 250);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_unparseable_value_uses_default() {
        let config = BusterConfig::from_lookup(lookup_from(&[
            ("BUSTER_MAX_TOKENS", "lots"),
            ("BUSTER_COUNTDOWN_SECS", ""),
        ]));

        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.countdown_ticks, DEFAULT_COUNTDOWN_TICKS);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = BusterConfig::from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "   ")]));
        assert!(!config.has_api_key());

        let config = BusterConfig::from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "sk-test")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_convenience_methods() {
        let config = BusterConfig::from_lookup(lookup_from(&[
            ("BUSTER_API_BASE_URL", "http://127.0.0.1:9999/v1/"),
            ("DEEPSEEK_API_KEY", "sk-secret"),
        ]));

        assert_eq!(
            config.chat_completions_url(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));

        let summary = config.summary();
        assert!(summary.contains("key=set"));
        assert!(!summary.contains("sk-secret"));
    }

    #[test]
    fn test_data_dir_override() {
        let config = BusterConfig::from_lookup(lookup_from(&[("BUSTER_DATA_DIR", "/tmp/buster")]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/buster"));
    }
}
