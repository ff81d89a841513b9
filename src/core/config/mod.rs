//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$DELETE_BRANCH_ON_MERGE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/delete-branch-on-merge/config.toml`
//! 3. `~/.config/delete-branch-on-merge/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use delete_branch_on_merge::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_url());
//! println!("Deadline: {:?}", config.timeout());
//! ```

pub mod schema;

pub use schema::{FileConfig, NetworkConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DELETE_BRANCH_ON_MERGE_CONFIG";

/// Directory name under the XDG / home config directory.
const APP_DIR: &str = "delete-branch-on-merge";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with accessors that apply defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    file: FileConfig,
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load configuration using an injected environment and home directory.
    pub fn load_with<F>(env: F, home: Option<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for path in Self::candidate_paths(&env, home.as_deref()) {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Config file locations in search order.
    pub fn candidate_paths<F>(env: &F, home: Option<&Path>) -> Vec<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut paths = Vec::new();

        if let Some(explicit) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            paths.push(PathBuf::from(explicit));
        }
        if let Some(xdg) = env("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
            paths.push(PathBuf::from(xdg).join(APP_DIR).join("config.toml"));
        }
        if let Some(home) = home {
            paths.push(home.join(".config").join(APP_DIR).join("config.toml"));
        }

        paths
    }

    /// Token from the config file, if any.
    pub fn token(&self) -> Option<&str> {
        self.file.token.as_deref()
    }

    /// REST API base URL without a trailing slash.
    ///
    /// Defaults to `https://api.github.com`.
    pub fn api_url(&self) -> &str {
        self.file
            .api_url
            .as_deref()
            .unwrap_or(schema::DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    /// Overall deadline for one invocation.
    pub fn timeout(&self) -> Duration {
        self.network().timeout()
    }

    /// Linear backoff unit between retries.
    pub fn retry_base_delay(&self) -> Duration {
        self.network().retry_base_delay()
    }

    /// Attempts per request, first try included.
    pub fn max_attempts(&self) -> u32 {
        self.network().max_attempts()
    }

    /// Path of the file this configuration came from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    fn network(&self) -> NetworkConfig {
        self.file.network.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with(env_of(&[]), Some(temp.path().to_path_buf())).unwrap();

        assert!(config.loaded_from().is_none());
        assert!(config.token().is_none());
        assert_eq!(config.api_url(), "https://api.github.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_base_delay(), Duration::from_millis(1000));
        assert_eq!(config.max_attempts(), 3);
    }

    #[test]
    fn explicit_env_path_wins() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("explicit.toml");
        fs::write(&explicit, "token = \"from-explicit\"\n").unwrap();

        let home_cfg = temp.path().join(".config").join(APP_DIR);
        fs::create_dir_all(&home_cfg).unwrap();
        fs::write(home_cfg.join("config.toml"), "token = \"from-home\"\n").unwrap();

        let env = env_of(&[(CONFIG_ENV, explicit.to_str().unwrap())]);
        let config = Config::load_with(env, Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(config.token(), Some("from-explicit"));
        assert_eq!(config.loaded_from(), Some(explicit.as_path()));
    }

    #[test]
    fn xdg_before_home() {
        let temp = TempDir::new().unwrap();
        let xdg = temp.path().join("xdg");
        fs::create_dir_all(xdg.join(APP_DIR)).unwrap();
        fs::write(xdg.join(APP_DIR).join("config.toml"), "token = \"from-xdg\"\n").unwrap();

        let home_cfg = temp.path().join(".config").join(APP_DIR);
        fs::create_dir_all(&home_cfg).unwrap();
        fs::write(home_cfg.join("config.toml"), "token = \"from-home\"\n").unwrap();

        let env = env_of(&[("XDG_CONFIG_HOME", xdg.to_str().unwrap())]);
        let config = Config::load_with(env, Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(config.token(), Some("from-xdg"));
    }

    #[test]
    fn missing_explicit_falls_through() {
        let temp = TempDir::new().unwrap();
        let home_cfg = temp.path().join(".config").join(APP_DIR);
        fs::create_dir_all(&home_cfg).unwrap();
        fs::write(home_cfg.join("config.toml"), "token = \"from-home\"\n").unwrap();

        let env = env_of(&[(CONFIG_ENV, "/definitely/not/here.toml")]);
        let config = Config::load_with(env, Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(config.token(), Some("from-home"));
    }

    #[test]
    fn parse_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "token = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn api_url_trailing_slash_stripped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "api_url = \"https://ghe.example.com/api/v3/\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[network]\nmax_attempts = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
