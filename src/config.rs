//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.vitrine/config.toml` (user)
//! 3. `/etc/vitrine/config.toml` (system)
//!
//! When no file is found the built-in defaults are used. Every section and
//! key is optional.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::stats::EndpointConfig;
use crate::{Result, VitrineError};

/// Default GitHub account shown on the page.
pub const DEFAULT_GITHUB_USER: &str = "dhruba001";
/// Default LeetCode account shown on the page.
pub const DEFAULT_LEETCODE_USER: &str = "dhruba_001";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub leetcode: LeetCodeConfig,
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Store file (default: `~/.cache/vitrine/store.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// TTL for fetched records in hours (default: 24).
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: None,
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

/// GitHub settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_user")]
    pub username: String,
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Recent repositories to include (default: 6).
    #[serde(default = "default_recent_repos")]
    pub recent_repos: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: default_github_user(),
            base_url: default_github_base_url(),
            timeout_secs: default_timeout_secs(),
            recent_repos: default_recent_repos(),
        }
    }
}

fn default_github_user() -> String {
    DEFAULT_GITHUB_USER.to_string()
}

fn default_github_base_url() -> String {
    crate::stats::github::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::stats::DEFAULT_TIMEOUT.as_secs()
}

fn default_recent_repos() -> usize {
    crate::stats::github::DEFAULT_RECENT_REPOS
}

/// LeetCode settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LeetCodeConfig {
    #[serde(default = "default_leetcode_user")]
    pub username: String,
    /// Candidate endpoints in priority order (default: the three public mirrors).
    #[serde(default = "EndpointConfig::defaults")]
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            username: default_leetcode_user(),
            endpoints: EndpointConfig::defaults(),
        }
    }
}

fn default_leetcode_user() -> String {
    DEFAULT_LEETCODE_USER.to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; error if missing)
    /// 2. `~/.vitrine/config.toml`
    /// 3. `/etc/vitrine/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VitrineError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VitrineError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(VitrineError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".vitrine").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/vitrine/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
