//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output sink trait and its terminal/recording implementations
//!
//! # Design
//!
//! All user-facing text goes through an [`output::OutputSink`] so that the
//! engine can be exercised in tests without touching the terminal.

pub mod output;
