//! delete-branch-on-merge - turn on GitHub's "automatically delete head
//! branches" setting for a repository
//!
//! A single invocation fetches the repository's settings, enables
//! `delete_branch_on_merge` if it is off, and fetches again to verify.
//! `--check` only reports; `--dry-run` reports what would change.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, wires, maps exit codes)
//! - [`engine`] - Mode selection, fetch/update/verify sequencing, rendering
//! - [`core`] - Domain types, repository parser, error taxonomy, configuration
//! - [`forge`] - GitHub REST client, retry policy, in-memory mock
//! - [`secrets`] - Token resolution
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. At most three HTTP calls per invocation, in strict sequence
//! 2. Check and dry-run modes never write
//! 3. Every failure maps to exactly one error kind and exit code
//! 4. Tokens never appear in output, logs, or `Debug` formatting

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod secrets;
pub mod ui;
