//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `oa-gateway.toml` in the working directory
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the TOML file expands to the environment value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_TIMEOUT_SECS;
use crate::error::{Error, Result};

/// Default config file looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "oa-gateway.toml";

/// Telegram transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather (required)
    pub token: String,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the conversational API
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum conversations to list. Declared for the listing command but
    /// not applied yet; the backend decides how many it returns.
    #[serde(default = "default_conversation_limit")]
    pub default_conversation_limit: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            default_conversation_limit: default_conversation_limit(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_conversation_limit() -> usize {
    10
}

/// Main configuration for oa-gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    /// Load from `oa-gateway.toml` if present, otherwise from the environment
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        Self::from_env()
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::read_toml_file(path, env_var)?;
        config.apply_overrides(env_var);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file without applying overrides
    fn read_toml_file<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content, lookup)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_var)
    }

    /// Parse TOML content, expanding `${VAR}` through `lookup`
    fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_env_vars(content, lookup);
        toml::from_str(&expanded).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite fields with any non-empty variable. Unparseable numbers keep
    /// the current value.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram.token = token;
        }
        if let Some(url) = lookup("API_SERVER_URL") {
            self.backend.url = url;
        }
        if let Some(limit) = lookup("DEFAULT_CONVERSATION_LIMIT").and_then(|v| v.trim().parse().ok()) {
            self.backend.default_conversation_limit = limit;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.backend.timeout_secs = secs;
        }
    }

    /// Reject configurations the gateway cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.trim().is_empty() {
            return Err(Error::Config("TELEGRAM_BOT_TOKEN is required".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::Config("Request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Replace `${VAR_NAME}` with the looked-up value; unknown variables expand to
/// an empty string.
fn expand_env_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }

            if let Some(env_value) = lookup(&var_name) {
                result.push_str(&env_value);
            }
        } else {
            result.push(c);
        }
    }

    result
}
