//! Process configuration read from environment variables.

use std::time::Duration;

use crate::domain::ConfigError;
use crate::infra::{LogFormat, UpstreamConfig};

/// Runtime configuration of the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub upstream: UpstreamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_format: LogFormat::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` when a variable is set but cannot
    /// be parsed, or when `UPSTREAM_MAX_ATTEMPTS` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to [`AppConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port)?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None => defaults.log_format,
            Some(value) => parse_log_format(value)?,
        };

        let base_url = lookup("UPSTREAM_BASE_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or(defaults.upstream.base_url);
        if base_url.is_empty() {
            return Err(invalid("UPSTREAM_BASE_URL", "must not be empty"));
        }

        let timeout_secs = parse_or(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            defaults.upstream.timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(invalid("UPSTREAM_TIMEOUT_SECS", "must be at least 1"));
        }

        let max_attempts = parse_or(
            &lookup,
            "UPSTREAM_MAX_ATTEMPTS",
            defaults.upstream.max_attempts,
        )?;
        if max_attempts == 0 {
            return Err(invalid("UPSTREAM_MAX_ATTEMPTS", "must be at least 1"));
        }

        let retry_delay_ms = parse_or(
            &lookup,
            "UPSTREAM_RETRY_DELAY_MS",
            u64::try_from(defaults.upstream.retry_delay.as_millis()).unwrap_or(1_000),
        )?;

        Ok(Self {
            host,
            port,
            log_format,
            upstream: UpstreamConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                max_attempts,
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &e.to_string())),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" | "" => Ok(LogFormat::Pretty),
        other => Err(invalid(
            "LOG_FORMAT",
            &format!("expected 'json' or 'pretty', got '{other}'"),
        )),
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
