//! CLI argument definitions for the Journey terminal assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use journey_core::{FallbackStrategy, JourneyConfig};

/// Journey: chat with the AI travel assistant from your terminal.
#[derive(Parser, Debug)]
#[command(name = "journey", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Assistant webhook URL.
    #[arg(short = 'w', long = "webhook-url")]
    pub webhook_url: Option<String>,

    /// Fallback strategy when the webhook is unavailable (uniform, topic-routed).
    #[arg(short = 'f', long = "fallback")]
    pub fallback: Option<FallbackStrategy>,

    /// User identifier forwarded to the webhook.
    #[arg(short = 'u', long = "user-id")]
    pub user_id: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Allow webhook endpoints on localhost.
    #[arg(long = "allow-local")]
    pub allow_local: bool,

    /// Skip the welcome turn.
    #[arg(long = "no-greeting")]
    pub no_greeting: bool,

    /// Send a single message, print the reply and exit.
    #[arg(long = "once")]
    pub once: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > JOURNEY_CONFIG env var > ~/.journey/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("JOURNEY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply flag overrides on top of a loaded (and env-adjusted) config.
    pub fn apply_overrides(&self, config: &mut JourneyConfig) {
        if let Some(ref url) = self.webhook_url {
            config.assistant.webhook_url = url.clone();
        }
        if let Some(fallback) = self.fallback {
            config.assistant.fallback = fallback;
        }
        if let Some(ref user_id) = self.user_id {
            config.assistant.user_id = user_id.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if self.allow_local {
            config.assistant.allow_local_endpoints = true;
        }
        if self.no_greeting {
            config.assistant.greeting = false;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".journey").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".journey").join("config.toml");
    }
    PathBuf::from("config.toml")
}
