//! Environment-driven client configuration.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read `key` through `lookup` and parse it, or fall back to `default`.
///
/// A missing variable is logged and defaulted; a present but unparsable one
/// is an error.
pub fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => {
            tracing::warn!("{key} not set; using default {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without trailing slash.
    pub api_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `FLEETDESK_API_URL`, `FLEETDESK_HTTP_TIMEOUT_SECS`, `FLEETDESK_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url: String = parse_var(&lookup, "FLEETDESK_API_URL", DEFAULT_API_URL.to_string())?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "FLEETDESK_API_URL".into(),
                value: api_url,
                reason: "expected an http(s) URL".into(),
            });
        }
        let timeout_secs: u64 =
            parse_var(&lookup, "FLEETDESK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        let mut config = Self::new(api_url);
        config.timeout = Duration::from_secs(timeout_secs);
        config.token = lookup("FLEETDESK_API_TOKEN").filter(|t| !t.trim().is_empty());
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
