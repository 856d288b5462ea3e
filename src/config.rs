//! Configuration management for group-runner
//!
//! Parses optional TOML configuration files and provides typed access to settings.
//! Every section is optional; an absent file behaves like `Config::default()`.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "group-runner.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Selection configuration
///
/// Fields are private so a validated config cannot be mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionConfig {
    /// Metadata key whose value holds a test's tags
    #[serde(default = "default_tag_key")]
    tag_key: String,
    /// Prefix of the environment flags published for included groups
    #[serde(default = "default_env_prefix")]
    env_prefix: String,
    /// Whether group flags are written into the process environment
    #[serde(default = "default_publish_env")]
    publish_env: bool,
}

impl SelectionConfig {
    /// Get the metadata key holding tags
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Get the prefix for published group flags
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Whether group flags are published to the process environment
    pub fn publish_env(&self) -> bool {
        self.publish_env
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tag_key: default_tag_key(),
            env_prefix: default_env_prefix(),
            publish_env: default_publish_env(),
        }
    }
}

fn default_tag_key() -> String {
    "group".to_string()
}

fn default_env_prefix() -> String {
    "JEST_GROUP_".to_string()
}

fn default_publish_env() -> bool {
    true
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must load. Without one, `group-runner.toml` in the
    /// working directory is used when present, otherwise defaults apply.
    pub fn discover(explicit: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "Loading config from working directory");
            Self::from_file(fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; can be called directly on
    /// configs built by other means.
    pub fn validate(&self) -> AppResult<()> {
        let tag_key = &self.selection.tag_key;
        if tag_key.is_empty() || tag_key.chars().any(char::is_whitespace) {
            return Err(AppError::Config(format!(
                "selection.tag_key must be a non-empty word without whitespace, got '{}'",
                tag_key
            )));
        }

        // The prefix becomes part of an environment variable name.
        let prefix = &self.selection.env_prefix;
        if prefix.is_empty() {
            return Err(AppError::Config(
                "selection.env_prefix must not be empty".to_string(),
            ));
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Config(format!(
                "selection.env_prefix '{}' may only contain ASCII letters, digits and '_'",
                prefix
            )));
        }
        if prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(AppError::Config(format!(
                "selection.env_prefix '{}' must not start with a digit",
                prefix
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
