//! core::types
//!
//! Value types passed between the parser, the API client and the engine.
//!
//! # Types
//!
//! - [`RepositoryRef`] - Owner and name identifying a repository
//! - [`RepositoryState`] - Point-in-time snapshot read from GitHub
//! - [`RepositorySettingsPatch`] - Write intent for the settings update
//! - [`OperationResult`] - Outcome of a check or configure call
//! - [`TokenMetadata`] - Identity and scopes of the configured credential
//!
//! None of these are mutated after construction. A fresh fetch produces a
//! fresh [`RepositoryState`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner and name of a GitHub repository.
///
/// Produced by [`crate::core::repo_ref::parse_repository`]. Casing is kept as
/// the user typed it; GitHub itself is case-insensitive.
///
/// # Example
///
/// ```
/// use delete_branch_on_merge::core::types::RepositoryRef;
///
/// let repo = RepositoryRef::new("octocat", "hello-world");
/// assert_eq!(repo.full_name(), "octocat/hello-world");
/// assert_eq!(repo.to_string(), "octocat/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Create a reference without validation.
    ///
    /// Use [`crate::core::repo_ref::parse_repository`] for user input.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository settings as last observed on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// Owner login
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Default branch (e.g. "main")
    pub default_branch: String,
    /// Whether head branches are deleted automatically after merge
    pub delete_branch_on_merge: bool,
}

impl RepositoryState {
    /// `owner/name`, always derived from the two fields.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Settings to write in a single update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettingsPatch {
    /// New value of the delete-branch-on-merge setting
    pub delete_branch_on_merge: bool,
}

impl RepositorySettingsPatch {
    /// Patch that turns the setting on.
    pub fn enable() -> Self {
        Self {
            delete_branch_on_merge: true,
        }
    }
}

/// Outcome of [`crate::engine::Configurator::configure`] or
/// [`crate::engine::Configurator::check_status`].
///
/// `was_already_enabled` implies `is_now_enabled`: this tool never turns the
/// setting off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Setting was on before this invocation
    pub was_already_enabled: bool,
    /// Setting is on after this invocation
    pub is_now_enabled: bool,
    /// Default branch of the repository
    pub default_branch: String,
    /// `owner/name` as reported by GitHub
    pub repository_full_name: String,
}

impl OperationResult {
    /// Result describing a state that was observed once and left untouched.
    pub fn observed(state: &RepositoryState) -> Self {
        Self {
            was_already_enabled: state.delete_branch_on_merge,
            is_now_enabled: state.delete_branch_on_merge,
            default_branch: state.default_branch.clone(),
            repository_full_name: state.full_name(),
        }
    }
}

/// Identity behind the configured token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMetadata {
    /// Login of the authenticated user
    pub username: String,
    /// OAuth scopes granted to the token, in header order without duplicates
    pub scopes: Vec<String>,
}

impl TokenMetadata {
    /// Check whether a scope was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
