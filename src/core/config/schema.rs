//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing so that a typo in the file fails
//! loudly instead of silently falling back to a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default overall deadline for one invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default linear backoff unit between retries.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Default number of attempts per request (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Upper bound accepted for `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// User configuration file.
///
/// # Example
///
/// ```toml
/// token = "ghp_..."
/// api_url = "https://github.example.com/api/v3"
///
/// [network]
/// timeout_secs = 30
/// retry_base_delay_ms = 1000
/// max_attempts = 3
/// ```
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Lowest-precedence credential
    pub token: Option<String>,

    /// REST API base URL (GitHub Enterprise)
    pub api_url: Option<String>,

    /// Network tuning
    pub network: Option<NetworkConfig>,
}

// Keep the token out of debug output.
impl std::fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfig")
            .field("has_token", &self.token.is_some())
            .field("api_url", &self.api_url)
            .field("network", &self.network)
            .finish()
    }
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_url '{}' must start with http:// or https://",
                    url
                )));
            }
        }

        if let Some(network) = &self.network {
            network.validate()?;
        }

        Ok(())
    }
}

/// Network tuning knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Overall deadline for one invocation, in seconds
    pub timeout_secs: Option<u64>,

    /// Linear backoff unit, in milliseconds
    pub retry_base_delay_ms: Option<u64>,

    /// Attempts per request, first try included
    pub max_attempts: Option<u32>,
}

impl NetworkConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "network.timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(attempts) = self.max_attempts {
            if !(1..=MAX_ATTEMPTS_LIMIT).contains(&attempts) {
                return Err(ConfigError::InvalidValue(format!(
                    "network.max_attempts must be between 1 and {}, got {}",
                    MAX_ATTEMPTS_LIMIT, attempts
                )));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(
            self.retry_base_delay_ms
                .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }
}
