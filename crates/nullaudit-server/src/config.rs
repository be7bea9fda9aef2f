//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, seed sizes, log
//! buffer capacity and rate limits. Every field has a default, so an empty
//! file is a valid configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3001)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Review tasks generated at start-up
    #[serde(default = "default_seed_tasks")]
    pub seed_tasks: usize,

    /// Log entries generated at start-up
    #[serde(default = "default_seed_logs")]
    pub seed_logs: usize,

    /// Spacing between seeded log entries in seconds
    #[serde(default = "default_seed_log_spacing")]
    pub seed_log_spacing_secs: u64,

    /// Maximum retained log entries
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Largest count accepted by the generate endpoints
    #[serde(default = "default_max_generate_batch")]
    pub max_generate_batch: usize,

    /// Seconds between background log entries (0 disables the feeder)
    #[serde(default = "default_log_feed_interval")]
    pub log_feed_interval_secs: u64,

    /// API rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Requests allowed per client per window (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    3001
}

fn default_seed_tasks() -> usize {
    5
}

fn default_seed_logs() -> usize {
    100
}

fn default_seed_log_spacing() -> u64 {
    15
}

fn default_log_capacity() -> usize {
    1000
}

fn default_max_generate_batch() -> usize {
    100
}

fn default_log_feed_interval() -> u64 {
    30
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl RateLimitConfig {
    /// Window length as a Duration
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            seed_tasks: default_seed_tasks(),
            seed_logs: default_seed_logs(),
            seed_log_spacing_secs: default_seed_log_spacing(),
            log_capacity: default_log_capacity(),
            max_generate_batch: default_max_generate_batch(),
            log_feed_interval_secs: default_log_feed_interval(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be at least 1".to_string()));
        }
        if self.max_generate_batch == 0 {
            return Err(ConfigError::Invalid(
                "max_generate_batch must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Background feed interval, or `None` when disabled
    pub fn log_feed_interval(&self) -> Option<Duration> {
        (self.log_feed_interval_secs > 0).then(|| Duration::from_secs(self.log_feed_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 3001);
        assert_eq!(config.seed_tasks, 5);
        assert_eq!(config.log_capacity, 1000);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.seed_logs, 100);
        assert_eq!(config.max_generate_batch, 100);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            seed_tasks = 12
            log_capacity = 250
            log_feed_interval_secs = 0

            [rate_limit]
            window_secs = 10
            max_requests = 5
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.seed_tasks, 12);
        assert_eq!(config.log_capacity, 250);
        assert_eq!(config.log_feed_interval(), None);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(10));
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let toml = r#"
            [rate_limit]
            max_requests = 0
        "#;
        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml("log_capacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ServerConfig::from_toml("bind_port = \"not a port\""),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
