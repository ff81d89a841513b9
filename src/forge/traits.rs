//! forge::traits
//!
//! The capability the engine needs from GitHub.
//!
//! # Design
//!
//! The trait is async because every operation is network I/O. Each call
//! takes the invocation's [`CancellationToken`]; when it fires, the call
//! returns a `General` cancellation error as soon as it can.
//!
//! All failures are already classified into the [`AppError`] taxonomy by
//! the implementation, so callers forward them unchanged.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::errors::AppError;
use crate::core::types::{RepositoryRef, RepositorySettingsPatch, RepositoryState, TokenMetadata};

/// Repository settings operations on GitHub.
///
/// Implementations must be `Send + Sync`.
///
/// # Example
///
/// ```ignore
/// use delete_branch_on_merge::forge::GitHubApi;
///
/// async fn enable(api: &dyn GitHubApi, repo: &RepositoryRef, cancel: &CancellationToken) -> Result<bool, AppError> {
///     api.update_repository(repo, RepositorySettingsPatch::enable(), cancel).await?;
///     Ok(api.get_repository(repo, cancel).await?.delete_branch_on_merge)
/// }
/// ```
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch the current settings of a repository.
    ///
    /// # Errors
    ///
    /// - `RepositoryNotFound` if the repository is absent or invisible
    /// - `AuthenticationFailed` / `InsufficientPermissions` / `RateLimited`
    /// - `General` for network, server and decode failures
    async fn get_repository(
        &self,
        repo: &RepositoryRef,
        cancel: &CancellationToken,
    ) -> Result<RepositoryState, AppError>;

    /// Apply a settings patch.
    ///
    /// Success says nothing about the resulting state; callers re-fetch to
    /// observe it.
    async fn update_repository(
        &self,
        repo: &RepositoryRef,
        patch: RepositorySettingsPatch,
        cancel: &CancellationToken,
    ) -> Result<(), AppError>;

    /// Identify the user behind the configured token and its scopes.
    async fn validate_token(&self, cancel: &CancellationToken) -> Result<TokenMetadata, AppError>;
}
