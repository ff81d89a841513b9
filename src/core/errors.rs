//! core::errors
//!
//! The closed error taxonomy shared by every layer.
//!
//! # Design
//!
//! Every failure that reaches the user is an [`AppError`] carrying one of six
//! [`ErrorKind`]s. The kind fixes the process exit code; the message is
//! human-readable and always includes the kind's remediation hint.
//!
//! [`exit_code_of`] walks the standard `source()` chain, so an `AppError`
//! wrapped by `anyhow` context (or any error that exposes it as a source)
//! still yields its own code. Errors that hide an `AppError` without
//! exposing it as a source map to `General`.
//!
//! # Example
//!
//! ```
//! use delete_branch_on_merge::core::errors::{exit_code_of, AppError, ErrorKind};
//!
//! let err = AppError::not_found("octocat", "ghost");
//! assert_eq!(err.kind(), ErrorKind::RepositoryNotFound);
//! assert!(err.to_string().contains("octocat/ghost"));
//! assert_eq!(exit_code_of(Some(&err)), 5);
//! assert_eq!(exit_code_of(None), 0);
//! ```

use std::error::Error as StdError;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Boxed cause attached to an [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error category. Each kind maps to a fixed process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network failure, unexpected API response, decode failure, cancellation.
    General,
    /// Malformed repository identifier or CLI input.
    InvalidArguments,
    /// Missing, invalid or expired credential.
    AuthenticationFailed,
    /// Authenticated but lacking the required access.
    InsufficientPermissions,
    /// Repository absent or invisible to the credential.
    RepositoryNotFound,
    /// API quota exhausted.
    RateLimited,
}

impl ErrorKind {
    /// Process exit code for this kind.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::General => 1,
            ErrorKind::InvalidArguments => 2,
            ErrorKind::AuthenticationFailed => 3,
            ErrorKind::InsufficientPermissions => 4,
            ErrorKind::RepositoryNotFound => 5,
            ErrorKind::RateLimited => 6,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::General => write!(f, "general"),
            ErrorKind::InvalidArguments => write!(f, "invalid arguments"),
            ErrorKind::AuthenticationFailed => write!(f, "authentication failed"),
            ErrorKind::InsufficientPermissions => write!(f, "insufficient permissions"),
            ErrorKind::RepositoryNotFound => write!(f, "repository not found"),
            ErrorKind::RateLimited => write!(f, "rate limited"),
        }
    }
}

/// Application error: a kind, a user-facing message, and an optional cause.
///
/// Immutable once constructed. `Display` renders the message only; the cause
/// is reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl AppError {
    /// Create an error of the given kind with no cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Exit code for this error's kind.
    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Unexpected failure. The message is used verbatim.
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::General, message)
    }

    /// Malformed user input. The message is used verbatim.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, message)
    }

    /// Missing or rejected credential.
    pub fn authentication_failed(detail: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::AuthenticationFailed,
            format!(
                "Authentication failed: {}. Check that your GitHub token is valid and not expired, \
                 or generate a new one at https://github.com/settings/tokens",
                detail.as_ref()
            ),
        )
    }

    /// Authenticated, but not allowed to perform the operation.
    ///
    /// `repository` is `owner/repo` when known.
    pub fn insufficient_permissions(repository: Option<&str>, detail: impl AsRef<str>) -> Self {
        let target = repository
            .map(|r| format!(" for '{}'", r))
            .unwrap_or_default();
        Self::new(
            ErrorKind::InsufficientPermissions,
            format!(
                "Insufficient permissions{}: {}. Changing repository settings requires admin \
                 access (classic token scope 'repo', or fine-grained 'Administration: write').",
                target,
                detail.as_ref()
            ),
        )
    }

    /// Repository missing or not visible to the credential.
    pub fn not_found(owner: &str, name: &str) -> Self {
        Self::new(
            ErrorKind::RepositoryNotFound,
            format!(
                "Repository '{}/{}' not found. Check that it exists and that your token has \
                 access to it.",
                owner, name
            ),
        )
    }

    /// API quota exhausted until `reset_at`.
    pub fn rate_limited(reset_at: DateTime<Utc>) -> Self {
        Self::new(
            ErrorKind::RateLimited,
            format!(
                "GitHub API rate limit exceeded. Limit resets at {}.",
                format_timestamp(reset_at)
            ),
        )
    }

    /// The operation was cancelled or its deadline elapsed.
    pub fn cancelled() -> Self {
        Self::general("Operation cancelled before it completed")
    }
}

/// Render a timestamp the way every user-facing message does (RFC 3339, UTC).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Map an optional error to a process exit code.
///
/// `None` is success (0). Otherwise the `source()` chain is walked and the
/// first [`AppError`] found decides the code; anything else is `General` (1).
pub fn exit_code_of(err: Option<&(dyn StdError + 'static)>) -> i32 {
    let mut current = match err {
        None => return 0,
        Some(err) => Some(err),
    };

    while let Some(err) = current {
        if let Some(app) = err.downcast_ref::<AppError>() {
            return app.exit_code();
        }
        current = err.source();
    }

    ErrorKind::General.exit_code()
}

/// Find the first [`AppError`] in an error's `source()` chain.
pub fn find_app_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a AppError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(app) = err.downcast_ref::<AppError>() {
            return Some(app);
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn exit_codes_match_table() {
        assert_eq!(ErrorKind::General.exit_code(), 1);
        assert_eq!(ErrorKind::InvalidArguments.exit_code(), 2);
        assert_eq!(ErrorKind::AuthenticationFailed.exit_code(), 3);
        assert_eq!(ErrorKind::InsufficientPermissions.exit_code(), 4);
        assert_eq!(ErrorKind::RepositoryNotFound.exit_code(), 5);
        assert_eq!(ErrorKind::RateLimited.exit_code(), 6);
    }

    #[test]
    fn every_constructor_fixes_its_code() {
        let reset = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let cases: Vec<(AppError, i32)> = vec![
            (AppError::general("boom"), 1),
            (AppError::cancelled(), 1),
            (AppError::invalid_arguments("bad"), 2),
            (AppError::authentication_failed("bad credentials"), 3),
            (AppError::insufficient_permissions(Some("o/r"), "nope"), 4),
            (AppError::not_found("o", "r"), 5),
            (AppError::rate_limited(reset), 6),
        ];
        for (err, code) in cases {
            assert_eq!(exit_code_of(Some(&err)), code, "{}", err);
        }
    }

    #[test]
    fn none_is_success() {
        assert_eq!(exit_code_of(None), 0);
    }

    #[test]
    fn foreign_error_is_general() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(exit_code_of(Some(&err)), 1);
    }

    #[test]
    fn wrapped_via_source_keeps_code() {
        #[derive(Debug, Error)]
        #[error("outer")]
        struct Outer(#[source] AppError);

        let err = Outer(AppError::not_found("octocat", "ghost"));
        assert_eq!(exit_code_of(Some(&err)), 5);
    }

    #[test]
    fn hidden_without_source_is_general() {
        #[derive(Debug, Error)]
        #[error("opaque: {0}")]
        struct Opaque(AppError);

        let err = Opaque(AppError::rate_limited(Utc::now()));
        assert_eq!(exit_code_of(Some(&err)), 1);
    }

    #[test]
    fn anyhow_context_keeps_code() {
        let err = anyhow::Error::new(AppError::invalid_arguments("bad")).context("while parsing");
        let dyn_err: &(dyn StdError + 'static) = err.as_ref();
        assert_eq!(exit_code_of(Some(dyn_err)), 2);
        assert!(find_app_error(dyn_err).is_some());
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = AppError::general("Network error").with_source(io);
        let source = err.source().expect("source");
        assert!(source.to_string().contains("refused"));
    }

    #[test]
    fn not_found_names_repository() {
        let err = AppError::not_found("octocat", "ghost");
        assert!(err.message().contains("octocat/ghost"));
        assert!(err.message().contains("access"));
    }

    #[test]
    fn rate_limited_formats_reset() {
        let reset = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let err = AppError::rate_limited(reset);
        assert!(err.to_string().contains("2030-01-02T03:04:05Z"));
    }

    #[test]
    fn permissions_without_repository() {
        let err = AppError::insufficient_permissions(None, "Resource not accessible");
        assert!(err.to_string().starts_with("Insufficient permissions: "));
        assert!(err.to_string().contains("admin"));
    }
}
