/*!
common/src/lib.rs

Shared configuration types and helpers for postwriter.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader that merges a default file with an optional override file
- Helpers to resolve API keys and the listening port from the environment
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";
pub const LOCAL_CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_NEWS_API_URL: &str = "https://api.currentsapi.services/v1/latest-news";
pub const DEFAULT_NEWS_API_KEY_ENV: &str = "CURRENTS_API_KEY";
pub const DEFAULT_NEWS_LANGUAGE: &str = "en";
/// Upper bound on headlines fed into prompts; also the default.
pub const MAX_HEADLINES: usize = 5;
pub const DEFAULT_NEWS_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// HTTP listener configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g. "0.0.0.0")
    pub address: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// News-search API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsConfig {
    pub api_url: Option<String>,
    /// Name of the env var holding the API key (the key itself never lives in the file)
    pub api_key_env: Option<String>,
    pub language: Option<String>,
    pub max_headlines: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl NewsConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_NEWS_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_NEWS_API_KEY_ENV)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_NEWS_LANGUAGE)
    }

    /// Configurable downwards only; capped at [`MAX_HEADLINES`].
    pub fn max_headlines(&self) -> usize {
        self.max_headlines.unwrap_or(MAX_HEADLINES).min(MAX_HEADLINES)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_NEWS_TIMEOUT_SECS)
    }
}

/// Remote (OpenAI-compatible) LLM configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl LlmConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_LLM_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_LLM_API_KEY_ENV)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// API keys resolved from the environment at startup.
#[derive(Clone)]
pub struct ApiKeys {
    pub news: String,
    pub llm: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("news", &"<redacted>")
            .field("llm", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// With neither present the built-in defaults apply.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Both outbound endpoints must be absolute URLs.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(self.news.api_url())
            .with_context(|| format!("Invalid news.api_url: {}", self.news.api_url()))?;
        url::Url::parse(self.llm.api_url())
            .with_context(|| format!("Invalid llm.api_url: {}", self.llm.api_url()))?;
        Ok(())
    }

    /// Apply a `PORT` value taken from the environment. An unparsable value is an error
    /// rather than a silent fallback.
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(raw) = port {
            let port: u16 = raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?;
            self.server.port = Some(port);
        }
        Ok(self)
    }

    /// Resolve both API keys from the env vars named in the config.
    pub fn api_keys(&self) -> Result<ApiKeys> {
        Ok(ApiKeys {
            news: require_env(self.news.api_key_env())?,
            llm: require_env(self.llm.api_key_env())?,
        })
    }
}

/// Resolve `config.default.toml` plus the override file: `explicit` (which must exist) or
/// `./config.toml` when present.
pub async fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);

    let override_path = match explicit {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Some(p)
        }
        None => Some(Path::new(LOCAL_CONFIG_FILE)).filter(|p| p.exists()),
    };

    Config::load_with_defaults(Some(default_path), override_path).await
}

/// Read a required, non-empty environment variable.
pub fn require_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .with_context(|| format!("Environment variable '{}' must be set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("Environment variable '{}' must not be empty", name);
    }
    Ok(value)
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
