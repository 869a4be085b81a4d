use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{JourneyError, Result};

/// Environment variable holding the assistant webhook URL.
pub const WEBHOOK_URL_ENV: &str = "JOURNEY_WEBHOOK_URL";
/// Legacy name of the webhook variable, still honoured when the primary one is unset.
pub const LEGACY_WEBHOOK_URL_ENV: &str = "VITE_N8N_WEBHOOK_URL";
/// Environment variable holding an optional user identifier.
pub const USER_ID_ENV: &str = "JOURNEY_USER_ID";

/// Top-level configuration for the Journey assistant.
///
/// Loaded from `~/.journey/config.toml` by default. Missing sections fall back
/// to their defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl JourneyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JourneyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration if the file exists.
    ///
    /// `Ok(None)` means there is no file at `path`; a file that exists but
    /// cannot be read or parsed is an error.
    pub fn try_load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("No config file at {}. Using defaults.", path.display());
                Self::default()
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// `JOURNEY_WEBHOOK_URL` wins over `VITE_N8N_WEBHOOK_URL`. Blank values are
    /// ignored so an exported-but-empty variable does not clobber the file.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(WEBHOOK_URL_ENV).or_else(|| non_blank(LEGACY_WEBHOOK_URL_ENV))
        {
            self.assistant.webhook_url = url;
        }
        if let Some(user_id) = non_blank(USER_ID_ENV) {
            self.assistant.user_id = user_id;
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// How replies are produced when the remote assistant is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Pick uniformly from a small pool of generic replies.
    Uniform,
    /// Route the user's text through ordered keyword buckets.
    #[default]
    TopicRouted,
}

impl std::str::FromStr for FallbackStrategy {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "uniform" => Ok(FallbackStrategy::Uniform),
            "topic_routed" | "topic" => Ok(FallbackStrategy::TopicRouted),
            other => Err(JourneyError::Config(format!(
                "unknown fallback strategy: {}",
                other
            ))),
        }
    }
}

/// Remote assistant (workflow webhook) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Webhook endpoint. Empty means fallback-only mode.
    pub webhook_url: String,
    /// Upper bound on a single webhook call before falling back.
    pub request_timeout_secs: u64,
    /// Fallback reply strategy.
    pub fallback: FallbackStrategy,
    /// Permit loopback endpoints (local workflow runners, test servers).
    pub allow_local_endpoints: bool,
    /// Optional user identifier forwarded as `userId`. Empty means none.
    pub user_id: String,
    /// Seed each conversation with a welcome turn.
    pub greeting: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            request_timeout_secs: 20,
            fallback: FallbackStrategy::TopicRouted,
            allow_local_endpoints: false,
            user_id: String::new(),
            greeting: true,
        }
    }
}

impl AssistantConfig {
    /// The configured user identifier, if any.
    pub fn user_id(&self) -> Option<&str> {
        let trimmed = self.user_id.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = JourneyConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.assistant.webhook_url.is_empty());
        assert_eq!(config.assistant.request_timeout_secs, 20);
        assert_eq!(config.assistant.fallback, FallbackStrategy::TopicRouted);
        assert!(!config.assistant.allow_local_endpoints);
        assert!(config.assistant.greeting);
        assert_eq!(config.assistant.user_id(), None);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[assistant]
webhook_url = "https://hooks.acme.travel/webhook/chat"
request_timeout_secs = 5
fallback = "uniform"
allow_local_endpoints = true
user_id = "user-42"
greeting = false
"#;
        let file = create_temp_config(content);
        let config = JourneyConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(
            config.assistant.webhook_url,
            "https://hooks.acme.travel/webhook/chat"
        );
        assert_eq!(config.assistant.request_timeout_secs, 5);
        assert_eq!(config.assistant.fallback, FallbackStrategy::Uniform);
        assert!(config.assistant.allow_local_endpoints);
        assert_eq!(config.assistant.user_id(), Some("user-42"));
        assert!(!config.assistant.greeting);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[assistant]
fallback = "uniform"
"#;
        let file = create_temp_config(content);
        let config = JourneyConfig::load(file.path()).unwrap();
        assert_eq!(config.assistant.fallback, FallbackStrategy::Uniform);
        assert_eq!(config.assistant.request_timeout_secs, 20);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = JourneyConfig::load(file.path()).unwrap();
        assert!(config.assistant.greeting);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("[assistant\nwebhook_url = ");
        let result = JourneyConfig::load(file.path());
        assert!(matches!(result, Err(JourneyError::Config(_))));
    }

    #[test]
    fn test_load_unknown_fallback_is_error() {
        let file = create_temp_config("[assistant]\nfallback = \"psychic\"\n");
        assert!(JourneyConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = JourneyConfig::load_or_default(Path::new("/nonexistent/journey.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_try_load_missing_file_is_none() {
        let result = JourneyConfig::try_load(Path::new("/nonexistent/journey.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_try_load_broken_file_is_error() {
        let file = create_temp_config("[assistant\nbroken");
        let result = JourneyConfig::try_load(file.path());
        assert!(matches!(result, Err(JourneyError::Config(_))));
    }

    #[test]
    fn test_try_load_existing_file() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = JourneyConfig::try_load(file.path()).unwrap().unwrap();
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_load_or_default_broken_file() {
        let file = create_temp_config("[assistant\nbroken");
        let config = JourneyConfig::load_or_default(file.path());
        assert!(config.assistant.greeting);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = JourneyConfig::default();
        config.assistant.webhook_url = "https://hooks.acme.travel/x".to_string();
        config.assistant.fallback = FallbackStrategy::Uniform;
        config.save(&path).unwrap();

        let reloaded = JourneyConfig::load(&path).unwrap();
        assert_eq!(reloaded.assistant.webhook_url, config.assistant.webhook_url);
        assert_eq!(reloaded.assistant.fallback, FallbackStrategy::Uniform);
    }

    #[test]
    fn test_env_primary_webhook_wins() {
        let env = env_of(&[
            (WEBHOOK_URL_ENV, "https://primary.acme.travel/hook"),
            (LEGACY_WEBHOOK_URL_ENV, "https://legacy.acme.travel/hook"),
        ]);
        let mut config = JourneyConfig::default();
        config.apply_env_from(|k| env.get(k).cloned());
        assert_eq!(
            config.assistant.webhook_url,
            "https://primary.acme.travel/hook"
        );
    }

    #[test]
    fn test_env_legacy_webhook_used_when_primary_missing() {
        let env = env_of(&[(LEGACY_WEBHOOK_URL_ENV, "https://legacy.acme.travel/hook")]);
        let mut config = JourneyConfig::default();
        config.apply_env_from(|k| env.get(k).cloned());
        assert_eq!(config.assistant.webhook_url, "https://legacy.acme.travel/hook");
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let env = env_of(&[(WEBHOOK_URL_ENV, "   "), (USER_ID_ENV, "")]);
        let mut config = JourneyConfig::default();
        config.assistant.webhook_url = "https://file.acme.travel/hook".to_string();
        config.apply_env_from(|k| env.get(k).cloned());
        assert_eq!(config.assistant.webhook_url, "https://file.acme.travel/hook");
        assert_eq!(config.assistant.user_id(), None);
    }

    #[test]
    fn test_env_user_id() {
        let env = env_of(&[(USER_ID_ENV, "traveller-7")]);
        let mut config = JourneyConfig::default();
        config.apply_env_from(|k| env.get(k).cloned());
        assert_eq!(config.assistant.user_id(), Some("traveller-7"));
    }

    #[test]
    fn test_fallback_strategy_from_str() {
        assert_eq!(
            "uniform".parse::<FallbackStrategy>().unwrap(),
            FallbackStrategy::Uniform
        );
        assert_eq!(
            "topic-routed".parse::<FallbackStrategy>().unwrap(),
            FallbackStrategy::TopicRouted
        );
        assert_eq!(
            " Topic ".parse::<FallbackStrategy>().unwrap(),
            FallbackStrategy::TopicRouted
        );
        assert!("random".parse::<FallbackStrategy>().is_err());
    }

    #[test]
    fn test_user_id_trimmed() {
        let config = AssistantConfig {
            user_id: "  abc  ".to_string(),
            ..AssistantConfig::default()
        };
        assert_eq!(config.user_id(), Some("abc"));
    }
}
