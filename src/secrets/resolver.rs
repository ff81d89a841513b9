//! secrets::resolver
//!
//! Picks the token from the first source that has one:
//!
//! 1. `--token` on the command line
//! 2. `GITHUB_TOKEN`
//! 3. `GH_TOKEN`
//! 4. `token` in the config file
//!
//! Values are trimmed; blank values count as absent.

use std::fmt;

use tracing::debug;

use super::traits::CredentialSource;
use crate::core::errors::AppError;

/// Environment variables consulted, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Where a resolved token came from. Safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    Flag,
    Env(&'static str),
    ConfigFile,
}

impl fmt::Display for TokenOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenOrigin::Flag => write!(f, "--token"),
            TokenOrigin::Env(var) => write!(f, "${}", var),
            TokenOrigin::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Resolves the GitHub token from flag, environment and config file.
pub struct TokenResolver {
    explicit: Option<String>,
    config_token: Option<String>,
    env: EnvLookup,
}

impl TokenResolver {
    /// Resolver reading the process environment.
    pub fn new(explicit: Option<String>, config_token: Option<String>) -> Self {
        Self::with_env(explicit, config_token, |key| std::env::var(key).ok())
    }

    /// Resolver with an injected environment lookup.
    pub fn with_env<F>(explicit: Option<String>, config_token: Option<String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            explicit,
            config_token,
            env: Box::new(env),
        }
    }

    /// Resolve the token together with where it came from.
    pub fn resolve(&self) -> Result<(String, TokenOrigin), AppError> {
        if let Some(token) = non_blank(self.explicit.as_deref()) {
            return Ok((token, TokenOrigin::Flag));
        }

        for var in TOKEN_ENV_VARS {
            if let Some(token) = non_blank((self.env)(var).as_deref()) {
                return Ok((token, TokenOrigin::Env(var)));
            }
        }

        if let Some(token) = non_blank(self.config_token.as_deref()) {
            return Ok((token, TokenOrigin::ConfigFile));
        }

        Err(AppError::authentication_failed(
            "no GitHub token found. Pass --token, set GITHUB_TOKEN or GH_TOKEN, \
             or add a `token` entry to the config file",
        ))
    }
}

impl CredentialSource for TokenResolver {
    fn get_credential(&self) -> Result<String, AppError> {
        let (token, origin) = self.resolve()?;
        debug!(%origin, "resolved GitHub token");
        Ok(token)
    }
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("explicit", &self.explicit.as_ref().map(|_| "[REDACTED]"))
            .field("config_token", &self.config_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flag_wins() {
        let resolver = TokenResolver::with_env(
            Some("from-flag".into()),
            Some("from-config".into()),
            env(&[("GITHUB_TOKEN", "from-github"), ("GH_TOKEN", "from-gh")]),
        );
        assert_eq!(
            resolver.resolve().unwrap(),
            ("from-flag".to_string(), TokenOrigin::Flag)
        );
    }

    #[test]
    fn github_token_before_gh_token() {
        let resolver = TokenResolver::with_env(
            None,
            None,
            env(&[("GITHUB_TOKEN", "from-github"), ("GH_TOKEN", "from-gh")]),
        );
        assert_eq!(
            resolver.resolve().unwrap(),
            ("from-github".to_string(), TokenOrigin::Env("GITHUB_TOKEN"))
        );
    }

    #[test]
    fn gh_token_fallback() {
        let resolver = TokenResolver::with_env(None, None, env(&[("GH_TOKEN", "from-gh")]));
        assert_eq!(resolver.get_credential().unwrap(), "from-gh");
    }

    #[test]
    fn config_file_last() {
        let resolver = TokenResolver::with_env(None, Some("from-config".into()), env(&[]));
        assert_eq!(
            resolver.resolve().unwrap(),
            ("from-config".to_string(), TokenOrigin::ConfigFile)
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        let resolver = TokenResolver::with_env(
            Some("   ".into()),
            Some("from-config".into()),
            env(&[("GITHUB_TOKEN", ""), ("GH_TOKEN", "\t")]),
        );
        assert_eq!(resolver.get_credential().unwrap(), "from-config");
    }

    #[test]
    fn values_are_trimmed() {
        let resolver = TokenResolver::with_env(None, None, env(&[("GITHUB_TOKEN", " abc \n")]));
        assert_eq!(resolver.get_credential().unwrap(), "abc");
    }

    #[test]
    fn missing_everywhere_is_auth_failure() {
        let resolver = TokenResolver::with_env(None, None, env(&[]));
        let err = resolver.get_credential().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("--token"));
        assert!(err.message().contains("GITHUB_TOKEN"));
        assert!(err.message().contains("GH_TOKEN"));
    }

    #[test]
    fn debug_redacts() {
        let resolver = TokenResolver::with_env(
            Some("ghp_secret".into()),
            Some("ghp_other".into()),
            env(&[]),
        );
        let debug = format!("{:?}", resolver);
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("ghp_other"));
        assert!(debug.contains("REDACTED"));
    }
}
