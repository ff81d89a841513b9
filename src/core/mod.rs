//! core
//!
//! Core domain types, parsing and error handling.
//!
//! # Modules
//!
//! - [`types`] - Repository reference, observed state, patch, results
//! - [`repo_ref`] - Repository identifier parser
//! - [`errors`] - Error taxonomy and exit codes
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - A [`types::RepositoryRef`] only exists once both segments are validated
//! - Every failure carries an [`errors::ErrorKind`]

pub mod config;
pub mod errors;
pub mod repo_ref;
pub mod types;
