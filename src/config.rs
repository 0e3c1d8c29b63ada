//! Top-level application configuration.
//!
//! Configuration is stored in `.qatrack/config.yaml` and includes:
//! - The default user scope
//! - The default sort column for listings
//! - The priority labels offered by the CLI
//! - The number of points kept in the trend log

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};
use crate::paths;
use crate::query::SortKey;
use crate::store::DEFAULT_TREND_CAPACITY;
use crate::types::{KNOWN_PRIORITIES, Scope, normalize_priority};
use crate::utils::io_context;

/// Environment variable overriding the configured user.
pub const USER_ENV_VAR: &str = "QATRACK_USER";

/// Keys accepted by `config get` and `config set`.
pub const VALID_KEYS: &[&str] = &["user", "default_sort", "priorities", "trend_capacity"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Scope used when no `--user` flag or environment override is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Column listings are sorted by when `--sort` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,

    /// Priority labels suggested by the CLI
    #[serde(default = "default_priorities")]
    pub priorities: Vec<String>,

    /// Maximum number of trend points kept per scope (default: 20)
    #[serde(default = "default_trend_capacity")]
    pub trend_capacity: usize,
}

fn default_priorities() -> Vec<String> {
    KNOWN_PRIORITIES.iter().map(|p| p.to_string()).collect()
}

fn default_trend_capacity() -> usize {
    DEFAULT_TREND_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user: None,
            default_sort: None,
            priorities: default_priorities(),
            trend_capacity: default_trend_capacity(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        paths::config_path()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content =
            fs::read_to_string(&path).map_err(|e| io_context(e, "read config at", &path))?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| io_context(e, "create directory for config at", parent))?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| io_context(e, "write config at", &path))?;
        Ok(())
    }

    /// Resolve the active user scope.
    ///
    /// Resolution order: explicit value (the `--user` flag), then
    /// `QATRACK_USER`, then the configured `user`.
    pub fn active_scope(&self, explicit: Option<&str>) -> Result<Scope> {
        if let Some(user) = explicit {
            return Scope::new(user);
        }
        if let Ok(user) = env::var(USER_ENV_VAR)
            && !user.trim().is_empty()
        {
            return Scope::new(user);
        }
        match self.user.as_deref() {
            Some(user) if !user.trim().is_empty() => Scope::new(user),
            _ => Err(QaError::NoActiveUser),
        }
    }

    /// The configured default sort column, if any.
    pub fn default_sort_key(&self) -> Result<Option<SortKey>> {
        self.default_sort
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()
    }

    /// Get a configuration value as display text.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "user" => self
                .user
                .clone()
                .ok_or_else(|| QaError::Config("user not set".to_string())),
            "default_sort" => self
                .default_sort
                .clone()
                .ok_or_else(|| QaError::Config("default_sort not set".to_string())),
            "priorities" => Ok(self.priorities.join(", ")),
            "trend_capacity" => Ok(self.trend_capacity.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Validate and set a configuration value. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "user" => {
                let scope = Scope::new(value)?;
                self.user = Some(scope.to_string());
            }
            "default_sort" => {
                let sort_key: SortKey = value.parse()?;
                self.default_sort = Some(sort_key.to_string());
            }
            "priorities" => {
                let priorities: Vec<String> = value
                    .split(',')
                    .map(normalize_priority)
                    .filter(|p| !p.is_empty())
                    .collect();
                if priorities.is_empty() {
                    return Err(QaError::Config(
                        "priorities must contain at least one label".to_string(),
                    ));
                }
                self.priorities = priorities;
            }
            "trend_capacity" => {
                let capacity: usize = value.trim().parse().map_err(|_| {
                    QaError::Config(format!(
                        "invalid trend_capacity '{value}'. Must be a positive integer"
                    ))
                })?;
                if capacity == 0 {
                    return Err(QaError::Config(
                        "trend_capacity must be at least 1".to_string(),
                    ));
                }
                self.trend_capacity = capacity;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> QaError {
    QaError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}
