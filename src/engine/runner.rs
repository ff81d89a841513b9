//! engine::runner
//!
//! The single entry point for one invocation.
//!
//! # Architecture
//!
//! ```text
//! Mode::from_flags -> Configurator (check_status | configure) -> render
//! ```
//!
//! Errors from the configurator are returned unchanged; the caller maps them
//! to an exit code and prints them. The only error raised here is the
//! `General` failure for an apply that did not verify.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::configure::Configurator;
use super::modes::Mode;
use crate::core::errors::AppError;
use crate::core::types::{OperationResult, RepositoryRef};
use crate::forge::GitHubApi;
use crate::ui::output::OutputSink;

/// Runs one mode against one repository and renders the outcome.
pub struct Controller<'a> {
    configurator: Configurator<'a>,
    output: &'a dyn OutputSink,
}

impl<'a> Controller<'a> {
    pub fn new(api: &'a dyn GitHubApi, output: &'a dyn OutputSink) -> Self {
        Self {
            configurator: Configurator::new(api, output),
            output,
        }
    }

    /// Run the mode selected by `check_only` and `dry_run`.
    ///
    /// `check_only` wins over `dry_run`.
    pub async fn run(
        &self,
        repo: &RepositoryRef,
        check_only: bool,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        let mode = Mode::from_flags(check_only, dry_run);
        debug!(repository = %repo, %mode, mutating = mode.is_mutating(), "running");

        match mode {
            Mode::Check => {
                let result = self.configurator.check_status(repo, cancel).await?;
                self.render_check(&result);
                Ok(())
            }
            Mode::DryRun => {
                let result = self.configurator.configure(repo, true, cancel).await?;
                self.render_dry_run(&result);
                Ok(())
            }
            Mode::Apply => {
                let result = self.configurator.configure(repo, false, cancel).await?;
                self.render_apply(&result)
            }
        }
    }

    fn render_check(&self, result: &OperationResult) {
        self.output
            .info(&format!("Repository: {}", result.repository_full_name));
        self.output
            .info(&format!("Default branch: {}", result.default_branch));
        if result.is_now_enabled {
            self.output.success("Delete branch on merge: enabled");
        } else {
            self.output.info("Delete branch on merge: disabled");
            self.output.info(&format!(
                "Run 'delete-branch-on-merge {}' to enable it.",
                result.repository_full_name
            ));
        }
    }

    fn render_dry_run(&self, result: &OperationResult) {
        if result.was_already_enabled {
            self.output.success(&format!(
                "Delete branch on merge is already enabled for {}",
                result.repository_full_name
            ));
            self.output.info("No changes needed.");
        } else {
            self.output.info(&format!(
                "[DRY-RUN] Would enable delete branch on merge for {} (default branch: {})",
                result.repository_full_name, result.default_branch
            ));
            self.output.info("No changes made.");
        }
    }

    fn render_apply(&self, result: &OperationResult) -> Result<(), AppError> {
        if result.was_already_enabled {
            self.output.success(&format!(
                "Delete branch on merge is already enabled for {}",
                result.repository_full_name
            ));
            Ok(())
        } else if result.is_now_enabled {
            self.output.success(&format!(
                "Successfully enabled delete branch on merge for {}",
                result.repository_full_name
            ));
            Ok(())
        } else {
            Err(AppError::general(format!(
                "Failed to enable delete branch on merge for {}: the setting is still disabled \
                 after the update",
                result.repository_full_name
            )))
        }
    }
}
