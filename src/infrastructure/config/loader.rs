use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::Config;

/// Project configuration file.
pub const CONFIG_FILE: &str = "config/analyzer.yaml";

/// Optional local overrides, not meant to be committed.
pub const LOCAL_CONFIG_FILE: &str = "config/local.yaml";

/// Prefix of environment overrides; nesting uses `__`.
pub const ENV_PREFIX: &str = "ANALYZER_";

/// Bare environment variable holding the LLM API key.
pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid refresh hour: {0}. Must be between 0 and 23")]
    InvalidRefreshHour(u32),

    #[error("Invalid refresh buffer: {0} minutes. Must be between 0 and 59")]
    InvalidRefreshBuffer(u32),

    #[error("Invalid {0}: must be greater than 0")]
    ZeroTtl(&'static str),

    #[error("Invalid default_repo_limit: must be greater than 0")]
    ZeroRepoLimit,

    #[error("Invalid server.warm_limit: must be greater than 0")]
    ZeroWarmLimit,

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error("Invalid backoff_factor: {0}. Must be at least 1")]
    InvalidBackoffFactor(u32),

    #[error(
        "Invalid retry delays: initial_delay_ms ({0}) must not exceed max_delay_ms ({1})"
    )]
    InvalidDelays(u64, u64),

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `config/analyzer.yaml`
    /// 3. `config/local.yaml`
    /// 4. `ANALYZER_*` environment variables
    /// 5. `LLM_API_KEY`
    pub fn load() -> Result<Config> {
        Self::load_from(None)
    }

    /// Load with `path` replacing the two project files when given.
    /// Environment overrides still apply.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        figment = match path {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment
                .merge(Yaml::file(CONFIG_FILE))
                .merge(Yaml::file(LOCAL_CONFIG_FILE)),
        };

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "llm.api_key".into()))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.refresh.hour > 23 {
            return Err(ConfigError::InvalidRefreshHour(config.refresh.hour));
        }
        if config.refresh.buffer_minutes > 59 {
            return Err(ConfigError::InvalidRefreshBuffer(
                config.refresh.buffer_minutes,
            ));
        }

        if config.cache.analysis_ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl("cache.analysis_ttl_secs"));
        }
        if config.cache.popular_repos_ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl("cache.popular_repos_ttl_secs"));
        }
        if config.cache.popular_repos_key.trim().is_empty() {
            return Err(ConfigError::EmptyValue("cache.popular_repos_key"));
        }

        if config.default_repo_limit == 0 {
            return Err(ConfigError::ZeroRepoLimit);
        }
        if config.server.warm_limit == 0 {
            return Err(ConfigError::ZeroWarmLimit);
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }
        if config.retry.backoff_factor < 1 {
            return Err(ConfigError::InvalidBackoffFactor(
                config.retry.backoff_factor,
            ));
        }
        if config.retry.initial_delay_ms > config.retry.max_delay_ms {
            return Err(ConfigError::InvalidDelays(
                config.retry.initial_delay_ms,
                config.retry.max_delay_ms,
            ));
        }

        if config.llm.api_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyValue("llm.api_endpoint"));
        }
        if config.llm.model.trim().is_empty() {
            return Err(ConfigError::EmptyValue("llm.model"));
        }
        if config.upstream.url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("upstream.url"));
        }

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
            return Err(ConfigError::InvalidRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
