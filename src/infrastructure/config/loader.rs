use anyhow::{Context, Result};
use figment::providers::{Env, Format, Json, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "GROUPSYNC_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    MissingFile(String),

    #[error("Organization cannot be empty")]
    EmptyOrganization,

    #[error("GitHub token cannot be empty")]
    EmptyGitHubToken,

    #[error("Directory credential '{0}' cannot be empty")]
    MissingDirectoryCredential(&'static str),

    #[error("Invalid sliding_expiration_secs: 0. Must be at least 1")]
    InvalidCacheExpiration,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Format of a configuration file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".json") {
            Some(Self::Json)
        } else if name.ends_with(".yml") || name.ends_with(".yaml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. The configuration file, if given (JSON or YAML by extension;
    ///    other extensions are ignored)
    /// 3. Environment variables (GROUPSYNC_* prefix, `__` separates nesting)
    ///
    /// Command-line overrides are applied by the caller afterwards, and
    /// validation is left to [`ConfigLoader::validate`] so that commands
    /// that need no credentials can still load a partial config.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()).into());
            }
            figment = match FileFormat::from_path(path) {
                Some(FileFormat::Json) => figment.merge(Json::file(path)),
                Some(FileFormat::Yaml) => figment.merge(Yaml::file(path)),
                None => figment,
            };
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// Whether `load` reads this file. Callers report ignored files once
    /// logging is up.
    pub fn is_supported_file(path: &Path) -> bool {
        FileFormat::from_path(path).is_some()
    }

    /// Validate a fully assembled configuration before a sync run
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.organization.trim().is_empty() {
            return Err(ConfigError::EmptyOrganization);
        }

        if config.github.token.is_empty() {
            return Err(ConfigError::EmptyGitHubToken);
        }

        let directory = &config.directory;
        for (name, value) in [
            ("tenant_id", &directory.tenant_id),
            ("client_id", &directory.client_id),
            ("client_secret", &directory.client_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingDirectoryCredential(name));
            }
        }

        if config.cache.sliding_expiration_secs == 0 {
            return Err(ConfigError::InvalidCacheExpiration);
        }

        Self::validate_logging(config)
    }

    /// Validate only the logging section
    pub fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
