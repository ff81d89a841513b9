//! engine::configure
//!
//! Sequencing of API calls for the check and configure operations.
//!
//! # Lifecycle
//!
//! ```text
//! configure: Fetch -> [already on? done] -> [dry run? done] -> Update -> Verify
//! check:     Fetch
//! ```
//!
//! # Invariants
//!
//! - Errors from any call are returned unchanged; nothing is retried here
//! - No write happens in check mode or dry-run mode
//! - After a successful write the state is fetched exactly once more, and the
//!   result reports what that fetch observed
//! - `was_already_enabled` implies `is_now_enabled`

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::errors::AppError;
use crate::core::types::{OperationResult, RepositoryRef, RepositorySettingsPatch};
use crate::forge::GitHubApi;
use crate::ui::output::OutputSink;

/// Orchestrates the fetch / update / verify sequence.
pub struct Configurator<'a> {
    api: &'a dyn GitHubApi,
    output: &'a dyn OutputSink,
}

impl<'a> Configurator<'a> {
    pub fn new(api: &'a dyn GitHubApi, output: &'a dyn OutputSink) -> Self {
        Self { api, output }
    }

    /// Enable delete-branch-on-merge unless it is already on.
    ///
    /// With `dry_run` the current state is reported and nothing is written.
    ///
    /// # Errors
    ///
    /// Any error from the fetch, the update or the verifying fetch, unchanged.
    pub async fn configure(
        &self,
        repo: &RepositoryRef,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> Result<OperationResult, AppError> {
        self.output
            .verbose(&format!("Fetching repository settings for {}...", repo));
        let current = self.api.get_repository(repo, cancel).await?;

        if current.delete_branch_on_merge {
            debug!(repository = %repo, "setting already enabled");
            return Ok(OperationResult::observed(&current));
        }

        if dry_run {
            debug!(repository = %repo, "dry run, skipping update");
            return Ok(OperationResult::observed(&current));
        }

        self.output
            .verbose(&format!("Updating repository settings for {}...", repo));
        self.api
            .update_repository(repo, RepositorySettingsPatch::enable(), cancel)
            .await?;

        self.output.verbose("Verifying the change...");
        let verified = self.api.get_repository(repo, cancel).await?;
        debug!(
            repository = %repo,
            enabled = verified.delete_branch_on_merge,
            "verified settings after update"
        );

        Ok(OperationResult {
            was_already_enabled: false,
            is_now_enabled: verified.delete_branch_on_merge,
            default_branch: verified.default_branch.clone(),
            repository_full_name: verified.full_name(),
        })
    }

    /// Report the current setting. Never writes.
    pub async fn check_status(
        &self,
        repo: &RepositoryRef,
        cancel: &CancellationToken,
    ) -> Result<OperationResult, AppError> {
        self.output
            .verbose(&format!("Fetching repository settings for {}...", repo));
        let current = self.api.get_repository(repo, cancel).await?;
        Ok(OperationResult::observed(&current))
    }
}
