//! secrets::traits
//!
//! Abstraction over where the GitHub credential comes from.

use crate::core::errors::AppError;

/// A source of the GitHub token used for API calls.
///
/// Implementations must be thread-safe (Send + Sync) and must never
/// log, print, or include the credential in error messages.
///
/// # Example
///
/// ```
/// use delete_branch_on_merge::secrets::{CredentialSource, TokenResolver};
///
/// let resolver = TokenResolver::new(Some("ghp_example".into()), None);
/// assert_eq!(resolver.get_credential().unwrap(), "ghp_example");
/// ```
pub trait CredentialSource: Send + Sync {
    /// Return the credential.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` when no credential is available.
    ///
    /// # Security
    ///
    /// The returned value is the raw secret. Do not log or print it.
    fn get_credential(&self) -> Result<String, AppError>;
}
