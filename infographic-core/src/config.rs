//! Configuration for generation and the feed.
//!
//! Both configs are plain builders with defaults. `from_env` reads the
//! environment; invalid values are logged and replaced by the default.

use std::path::PathBuf;
use tracing::warn;

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "INFOGRAPHIC_MODEL";
pub const ENV_MAX_TOKENS: &str = "INFOGRAPHIC_MAX_TOKENS";
pub const ENV_WEB_SEARCH: &str = "INFOGRAPHIC_WEB_SEARCH";
pub const ENV_SAVE_PATH: &str = "INFOGRAPHIC_SAVE_PATH";

const SAVE_FILE: &str = "saved_infographic.json";

/// Configuration for the Claude-backed generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// API key; `None` makes every generation fail with a credentials error.
    pub api_key: Option<String>,

    /// The model to use (the client default when `None`).
    pub model: Option<String>,

    /// Maximum tokens per response.
    pub max_tokens: usize,

    pub temperature: Option<f32>,

    /// Ground answers with the server-side web search tool.
    pub web_search: bool,

    /// Cap on searches per request.
    pub max_searches: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            max_tokens: 8192,
            temperature: None,
            web_search: true,
            max_searches: Some(5),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.api_key = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty());
        config.model = lookup(ENV_MODEL).filter(|model| !model.trim().is_empty());

        if let Some(raw) = lookup(ENV_MAX_TOKENS) {
            match raw.trim().parse::<usize>() {
                Ok(tokens) if tokens > 0 => config.max_tokens = tokens,
                _ => warn!(value = %raw, "ignoring invalid {ENV_MAX_TOKENS}"),
            }
        }

        if let Some(raw) = lookup(ENV_WEB_SEARCH) {
            match parse_flag(&raw) {
                Some(enabled) => config.web_search = enabled,
                None => warn!(value = %raw, "ignoring invalid {ENV_WEB_SEARCH}"),
            }
        }

        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn with_max_searches(mut self, max: u32) -> Self {
        self.max_searches = Some(max);
        self
    }
}

/// Configuration for an infographic session.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub generator: GeneratorConfig,

    /// Location of the single save slot.
    pub save_path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            save_path: default_save_path(),
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let save_path = lookup(ENV_SAVE_PATH)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_save_path);
        Self {
            generator: GeneratorConfig::from_lookup(&lookup),
            save_path,
        }
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }
}

/// `<data dir>/infographic/saved_infographic.json`, or the working directory
/// when the platform has no data dir.
pub fn default_save_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("infographic"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SAVE_FILE)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GeneratorConfig::default());
        assert!(config.web_search);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_env_values() {
        let config = FeedConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "claude-test"),
            (ENV_MAX_TOKENS, "2048"),
            (ENV_WEB_SEARCH, "off"),
            (ENV_SAVE_PATH, "/tmp/slot.json"),
        ]));
        assert_eq!(config.generator.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generator.model.as_deref(), Some("claude-test"));
        assert_eq!(config.generator.max_tokens, 2048);
        assert!(!config.generator.web_search);
        assert_eq!(config.save_path, PathBuf::from("/tmp/slot.json"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "  "),
            (ENV_MAX_TOKENS, "lots"),
            (ENV_WEB_SEARCH, "maybe"),
        ]));
        assert!(config.api_key.is_none());
        assert_eq!(config.max_tokens, GeneratorConfig::default().max_tokens);
        assert!(config.web_search);
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_api_key("k")
            .with_model("m")
            .with_max_tokens(100)
            .with_temperature(0.2)
            .with_web_search(false)
            .with_max_searches(2);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_tokens, 100);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_searches, Some(2));
        assert!(!config.web_search);
    }

    #[test]
    fn test_default_save_path_file_name() {
        assert!(default_save_path().ends_with(SAVE_FILE));
    }
}
