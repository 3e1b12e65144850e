// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.offq/config.toml` and includes:
//! - `remote`: the collaborator base URL, per-action routes, request timeout
//! - `probe`: health probe endpoint and backoff schedule
//! - `retention`: how long synced actions are kept
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".offq";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "queue.db";

/// Action type replayed by default.
pub const FORCE_LOGOUT: &str = "FORCE_LOGOUT";

/// Project configuration stored in `.offq/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Transport collaborator settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Health probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Retention of synced actions.
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Transport collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the collaborator, e.g. `http://localhost:8080`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Upper bound for a single replayed request in milliseconds (default: 10000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Action type to request path, e.g. `FORCE_LOGOUT = "/api/agents/force-logout"`.
    #[serde(default = "default_routes")]
    pub routes: BTreeMap<String, String>,
}

/// Health probe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Path probed on the collaborator (default: "/").
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Interval between probes while healthy, in milliseconds (default: 5000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Cap on the backoff delay in milliseconds (default: 60000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Max time to wait for a probe response in milliseconds (default: 3000).
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

/// Retention configuration for synced actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Age after which synced actions are purged, in seconds (default: 7 days).
    /// 0 = keep synced actions forever.
    #[serde(default = "default_synced_max_age_secs")]
    pub synced_max_age_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_routes() -> BTreeMap<String, String> {
    BTreeMap::from([(
        FORCE_LOGOUT.to_string(),
        "/api/agents/force-logout".to_string(),
    )])
}

fn default_health_path() -> String {
    "/".to_string()
}

fn default_base_delay_ms() -> u64 {
    5_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

fn default_synced_max_age_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: default_url(),
            request_timeout_ms: default_request_timeout_ms(),
            routes: default_routes(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            health_path: default_health_path(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig {
            synced_max_age_secs: default_synced_max_age_secs(),
        }
    }
}

impl RemoteConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Full URL for an action's route, if the action is configured.
    pub fn action_url(&self, action: &str) -> Option<String> {
        self.routes.get(action).map(|path| join_url(&self.url, path))
    }
}

impl ProbeConfig {
    /// Full URL of the health endpoint under the given base URL.
    pub fn health_url(&self, base: &str) -> String {
        join_url(base, &self.health_path)
    }

    /// Base delay as a [`Duration`].
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Max delay as a [`Duration`].
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RetentionConfig {
    /// Max age of synced actions, if bounded.
    pub fn synced_max_age(&self) -> Option<Duration> {
        (self.synced_max_age_secs > 0).then(|| Duration::from_secs(self.synced_max_age_secs))
    }
}

/// Join a base URL and an absolute path without doubling the slash.
fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl Config {
    /// Creates a default config pointing at the given collaborator URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let config = Config {
            remote: RemoteConfig {
                url: url.into(),
                ..RemoteConfig::default()
            },
            ..Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let url = &self.remote.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid remote url '{}': must start with http:// or https://",
                url
            )));
        }

        for (action, path) in &self.remote.routes {
            if action.trim().is_empty() {
                return Err(Error::Config("route action cannot be empty".to_string()));
            }
            if !path.starts_with('/') {
                return Err(Error::Config(format!(
                    "route for '{}' must start with '/', got '{}'",
                    action, path
                )));
            }
        }

        if !self.probe.health_path.starts_with('/') {
            return Err(Error::Config(format!(
                "probe.health_path must start with '/', got '{}'",
                self.probe.health_path
            )));
        }
        if self.probe.base_delay_ms == 0 {
            return Err(Error::Config("probe.base_delay_ms must be > 0".to_string()));
        }
        if self.probe.max_delay_ms < self.probe.base_delay_ms {
            return Err(Error::Config(
                "probe.max_delay_ms must be >= probe.base_delay_ms".to_string(),
            ));
        }
        if self.probe.timeout_ms == 0 || self.remote.request_timeout_ms == 0 {
            return Err(Error::Config("timeouts must be > 0".to_string()));
        }
        Ok(())
    }

    /// Loads configuration from the given `.offq/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.offq/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .offq directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .offq directory by walking up from `start`.
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the queue database path inside a work directory.
pub fn get_db_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DB_FILE_NAME)
}

/// Initialize a new .offq directory at the given path.
pub fn init_work_dir(path: &Path, url: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = match url {
        Some(url) => Config::with_url(url)?,
        None => Config::default(),
    };

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
