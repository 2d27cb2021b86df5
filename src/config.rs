//! Client configuration from the environment

use crate::session::state::ParseStalePolicyError;
use crate::session::StalePolicy;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "REVIEW_CHAT_API_URL";
pub const TIMEOUT_VAR: &str = "REVIEW_CHAT_TIMEOUT_SECS";
pub const STALE_POLICY_VAR: &str = "REVIEW_CHAT_STALE_POLICY";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    EmptyUrl { var: &'static str },
    #[error("Invalid {var}: '{value}' is not a positive number of seconds")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("Invalid {var}: {source}")]
    InvalidStalePolicy {
        var: &'static str,
        #[source]
        source: ParseStalePolicyError,
    },
}

/// Configuration for the catalog client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint all backend operations are issued against
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// See [`ClientConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables take defaults
    ///
    /// # Errors
    ///
    /// Empty URL, non-positive or unparsable timeout, unknown stale policy.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::EmptyUrl { var: API_URL_VAR });
            }
            config.api_base_url = url.to_string();
        }

        if let Some(value) = lookup(TIMEOUT_VAR) {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value: value.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup(STALE_POLICY_VAR) {
            config.stale_policy = value
                .parse()
                .map_err(|source| ConfigError::InvalidStalePolicy {
                    var: STALE_POLICY_VAR,
                    source,
                })?;
        }

        Ok(config)
    }
}
