//! forge
//!
//! Access to the GitHub REST API.
//!
//! # Architecture
//!
//! The [`GitHubApi`] trait is the only thing the engine depends on. Commands
//! build a [`github::GitHubClient`] and pass it in; tests pass a
//! [`mock::MockGitHub`].
//!
//! # Modules
//!
//! - `traits`: The `GitHubApi` capability trait
//! - [`github`]: reqwest-based implementation with status mapping
//! - [`retry`]: Linear retry policy for transient failures
//! - [`mock`]: In-memory implementation for deterministic testing

pub mod github;
pub mod mock;
pub mod retry;
mod traits;

pub use github::GitHubClient;
pub use retry::RetryPolicy;
pub use traits::GitHubApi;
