//! Persisted application config
//!
//! `~/.taskdeck/config.toml`; `TASKDECK_URL` / `TASKDECK_TOKEN` take precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{load_toml, save_toml, taskdeck_dir};
use crate::error::Result;
use crate::stats::DEFAULT_PREVIEW_LIMIT;
use crate::store::ConsistencyMode;

pub const ENV_URL: &str = "TASKDECK_URL";
pub const ENV_TOKEN: &str = "TASKDECK_TOKEN";

/// Application config
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API root; tasks live under `{base_url}/tasks`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds; unset keeps the HTTP client default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Local cache behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "strict" | "legacy"
    #[serde(default)]
    pub consistency: ConsistencyMode,
    /// Number of in-progress tasks to preview
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
    /// Upper bound for a single fetch
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

fn default_page_limit() -> u32 {
    1000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            consistency: ConsistencyMode::default(),
            preview_limit: default_preview_limit(),
            page_limit: default_page_limit(),
        }
    }
}

impl Config {
    /// Override from the environment (empty values are ignored)
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_URL).ok(),
            std::env::var(ENV_TOKEN).ok(),
        );
    }

    /// Override base_url / token with explicit values (empty values are ignored)
    pub fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.server.base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.server.token = Some(token);
        }
    }
}

/// Config file path
pub fn config_path() -> PathBuf {
    taskdeck_dir().join("config.toml")
}

/// Load config from a path (defaults when the file is missing)
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load_toml(path)
}

/// Load config and apply the environment; a broken file logs a warning and falls back to defaults
pub fn load_config() -> Config {
    let path = config_path();
    let mut config = load_config_from(&path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
        Config::default()
    });
    config.apply_env();
    config
}

/// Save config to a path
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    save_toml(path, config)
}

/// Save config
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&config_path(), config)
}
