//! Configuration file handling.
//!
//! This module loads `.storepulse.toml`, merges it with CLI arguments and
//! environment variables, and resolves the settings the clients need.
//! Credentials are only taken from the CLI or the environment.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".storepulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store API settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Language model settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Store API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the shop, e.g. `https://shop.example.com`.
    #[serde(default)]
    pub url: String,

    /// Path of the orders endpoint below the base URL.
    #[serde(default = "default_orders_path")]
    pub orders_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            orders_path: default_orders_path(),
            timeout_seconds: default_store_timeout(),
        }
    }
}

fn default_orders_path() -> String {
    "/wp-json/wc/v3/orders".to_string()
}

fn default_store_timeout() -> u64 {
    30
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Language the recommendations are written in.
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            language: default_language(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_language() -> String {
    "Greek".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

/// Resolved store client settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub base_url: String,
    pub orders_path: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("base_url", &self.base_url)
            .field("orders_path", &self.orders_path)
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Resolved language model client settings.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub language: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("language", &self.language)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Everything needed to perform a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreSettings,
    pub llm: LlmSettings,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>, ConfigError> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or through their environment
    /// variables) override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.shop_url {
            self.store.url = url.clone();
        }
        if let Some(timeout) = args.store_timeout {
            self.store.timeout_seconds = timeout;
        }

        if let Some(ref model) = args.model {
            self.llm.model = model.clone();
        }
        if let Some(ref api_url) = args.openai_api_url {
            self.llm.api_url = api_url.clone();
        }
        if let Some(ref language) = args.language {
            self.llm.language = language.clone();
        }
        if let Some(timeout) = args.llm_timeout {
            self.llm.timeout_seconds = timeout;
        }
    }

    /// Combine the configuration with the credentials into client settings.
    ///
    /// Fails with the name of the first missing required value.
    pub fn resolve(&self, args: &crate::cli::Args) -> Result<Settings, ConfigError> {
        let base_url = required(Some(&self.store.url), "SHOP_URL")?;
        let api_key = required(args.wc_key.as_ref(), "WC_KEY")?;
        let api_secret = required(args.wc_secret.as_ref(), "WC_SECRET")?;
        let llm_key = required(args.openai_api_key.as_ref(), "OPENAI_API_KEY")?;

        Ok(Settings {
            store: StoreSettings {
                base_url,
                orders_path: self.store.orders_path.clone(),
                api_key,
                api_secret,
                timeout_seconds: self.store.timeout_seconds,
            },
            llm: LlmSettings {
                api_url: self.llm.api_url.clone(),
                api_key: llm_key,
                model: self.llm.model.clone(),
                language: self.llm.language.clone(),
                timeout_seconds: self.llm.timeout_seconds,
            },
        })
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

fn required(value: Option<&String>, name: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing(name)),
    }
}
