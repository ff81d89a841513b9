//! forge::mock
//!
//! Mock GitHub implementation for deterministic testing.
//!
//! # Design
//!
//! The mock keeps one repository state in memory, applies updates to it,
//! records every call, and can be told to fail a specific operation.
//!
//! # Example
//!
//! ```
//! use delete_branch_on_merge::core::types::{RepositoryRef, RepositorySettingsPatch};
//! use delete_branch_on_merge::forge::mock::MockGitHub;
//! use delete_branch_on_merge::forge::GitHubApi;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let api = MockGitHub::new("octocat", "hello-world", false);
//! let repo = RepositoryRef::new("octocat", "hello-world");
//! let cancel = CancellationToken::new();
//!
//! api.update_repository(&repo, RepositorySettingsPatch::enable(), &cancel).await.unwrap();
//! assert!(api.get_repository(&repo, &cancel).await.unwrap().delete_branch_on_merge);
//! assert_eq!(api.update_count(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::traits::GitHubApi;
use crate::core::errors::{AppError, ErrorKind};
use crate::core::types::{RepositoryRef, RepositorySettingsPatch, RepositoryState, TokenMetadata};

/// Mock GitHub for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockGitHub {
    inner: Arc<Mutex<MockGitHubInner>>,
}

#[derive(Debug)]
struct MockGitHubInner {
    /// Current repository settings.
    state: RepositoryState,
    /// Identity returned by `validate_token`.
    token: TokenMetadata,
    /// Whether successful updates change `state`.
    apply_updates: bool,
    /// Failure to inject.
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Which operation should fail, and how.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Every `get_repository` call fails.
    GetRepository(ErrorKind, String),
    /// The first `get_repository` succeeds; later ones fail.
    VerifyFetch(ErrorKind, String),
    /// `update_repository` fails.
    UpdateRepository(ErrorKind, String),
    /// `validate_token` fails.
    ValidateToken(ErrorKind, String),
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetRepository {
        owner: String,
        name: String,
    },
    UpdateRepository {
        owner: String,
        name: String,
        patch: RepositorySettingsPatch,
    },
    ValidateToken,
}

impl MockGitHub {
    /// Mock holding a repository with `main` as its default branch.
    pub fn new(owner: &str, name: &str, delete_branch_on_merge: bool) -> Self {
        Self::with_state(RepositoryState {
            owner: owner.to_string(),
            name: name.to_string(),
            default_branch: "main".to_string(),
            delete_branch_on_merge,
        })
    }

    /// Mock holding an arbitrary repository state.
    pub fn with_state(state: RepositoryState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGitHubInner {
                state,
                token: TokenMetadata {
                    username: "octocat".to_string(),
                    scopes: vec!["repo".to_string()],
                },
                apply_updates: true,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Accept updates without changing the stored state.
    pub fn ignore_updates(self) -> Self {
        self.lock().apply_updates = false;
        self
    }

    /// Identity returned by `validate_token`.
    pub fn with_token(self, token: TokenMetadata) -> Self {
        self.lock().token = token;
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Number of `get_repository` calls.
    pub fn get_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::GetRepository { .. }))
    }

    /// Number of `update_repository` calls.
    pub fn update_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::UpdateRepository { .. }))
    }

    /// Current stored state.
    pub fn state(&self) -> RepositoryState {
        self.lock().state.clone()
    }

    fn count(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        self.lock().operations.iter().filter(|op| pred(op)).count()
    }

    fn lock(&self) -> MutexGuard<'_, MockGitHubInner> {
        // A panicking test thread must not hide the recorded calls.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn injected(kind: ErrorKind, message: &str) -> AppError {
    AppError::new(kind, message)
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn get_repository(
        &self,
        repo: &RepositoryRef,
        cancel: &CancellationToken,
    ) -> Result<RepositoryState, AppError> {
        let mut inner = self.lock();
        let previous_gets = inner
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::GetRepository { .. }))
            .count();
        inner.operations.push(MockOperation::GetRepository {
            owner: repo.owner().to_string(),
            name: repo.name().to_string(),
        });

        if cancel.is_cancelled() {
            return Err(AppError::cancelled());
        }
        match &inner.fail_on {
            Some(FailOn::GetRepository(kind, msg)) => return Err(injected(*kind, msg)),
            Some(FailOn::VerifyFetch(kind, msg)) if previous_gets > 0 => {
                return Err(injected(*kind, msg))
            }
            _ => {}
        }

        Ok(inner.state.clone())
    }

    async fn update_repository(
        &self,
        repo: &RepositoryRef,
        patch: RepositorySettingsPatch,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::UpdateRepository {
            owner: repo.owner().to_string(),
            name: repo.name().to_string(),
            patch,
        });

        if cancel.is_cancelled() {
            return Err(AppError::cancelled());
        }
        if let Some(FailOn::UpdateRepository(kind, msg)) = &inner.fail_on {
            return Err(injected(*kind, msg));
        }

        if inner.apply_updates {
            inner.state.delete_branch_on_merge = patch.delete_branch_on_merge;
        }
        Ok(())
    }

    async fn validate_token(&self, cancel: &CancellationToken) -> Result<TokenMetadata, AppError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ValidateToken);

        if cancel.is_cancelled() {
            return Err(AppError::cancelled());
        }
        if let Some(FailOn::ValidateToken(kind, msg)) = &inner.fail_on {
            return Err(injected(*kind, msg));
        }

        Ok(inner.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octocat", "hello-world")
    }

    #[tokio::test]
    async fn records_operations() {
        let api = MockGitHub::new("octocat", "hello-world", false);
        let cancel = CancellationToken::new();

        api.get_repository(&repo(), &cancel).await.unwrap();
        api.update_repository(&repo(), RepositorySettingsPatch::enable(), &cancel)
            .await
            .unwrap();
        api.validate_token(&cancel).await.unwrap();

        assert_eq!(
            api.operations(),
            vec![
                MockOperation::GetRepository {
                    owner: "octocat".into(),
                    name: "hello-world".into()
                },
                MockOperation::UpdateRepository {
                    owner: "octocat".into(),
                    name: "hello-world".into(),
                    patch: RepositorySettingsPatch::enable(),
                },
                MockOperation::ValidateToken,
            ]
        );
        assert!(api.state().delete_branch_on_merge);
    }

    #[tokio::test]
    async fn verify_fetch_fails_second_get_only() {
        let api = MockGitHub::new("octocat", "hello-world", false)
            .fail_on(FailOn::VerifyFetch(ErrorKind::General, "boom".into()));
        let cancel = CancellationToken::new();

        assert!(api.get_repository(&repo(), &cancel).await.is_ok());
        let err = api.get_repository(&repo(), &cancel).await.unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[tokio::test]
    async fn ignored_updates_keep_state() {
        let api = MockGitHub::new("octocat", "hello-world", false).ignore_updates();
        let cancel = CancellationToken::new();

        api.update_repository(&repo(), RepositorySettingsPatch::enable(), &cancel)
            .await
            .unwrap();
        assert!(!api.state().delete_branch_on_merge);
        assert_eq!(api.update_count(), 1);
    }

    #[tokio::test]
    async fn validate_token_returns_configured_identity() {
        let identity = TokenMetadata {
            username: "hubot".into(),
            scopes: vec!["admin:org".to_string()],
        };
        let api = MockGitHub::new("octocat", "hello-world", true).with_token(identity.clone());

        let got = api.validate_token(&CancellationToken::new()).await.unwrap();

        assert_eq!(got, identity);
        assert!(got.has_scope("admin:org"));
    }

    #[tokio::test]
    async fn cancelled_token_fails_calls() {
        let api = MockGitHub::new("octocat", "hello-world", false);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = api.get_repository(&repo(), &cancel).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::General);
    }
}
