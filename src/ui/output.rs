//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! The engine never prints. It hands plain message strings to an
//! [`OutputSink`], which owns prefixes and stream routing:
//! informational text goes to stdout, errors and verbose notes to stderr.

use std::sync::{Arc, Mutex};

/// Destination for user-facing messages.
pub trait OutputSink: Send + Sync {
    /// A completed action.
    fn success(&self, message: &str);

    /// A failure. Always shown.
    fn error(&self, message: &str);

    /// Regular informational output.
    fn info(&self, message: &str);

    /// Progress notes. No-op unless verbose output was requested.
    fn verbose(&self, message: &str);
}

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Verbose mode - progress notes on stderr
    Verbose,
}

impl Verbosity {
    /// Create verbosity from the `--verbose` flag.
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    verbosity: Verbosity,
}

impl ConsoleOutput {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl OutputSink for ConsoleOutput {
    fn success(&self, message: &str) {
        println!("✓ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn verbose(&self, message: &str) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("[verbose] {}", message);
        }
    }
}

/// Channel a recorded message was sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Success,
    Error,
    Info,
    Verbose,
}

/// Sink that keeps every message in memory, for tests.
///
/// Verbose messages are always recorded regardless of verbosity.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    messages: Arc<Mutex<Vec<(Channel, String)>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message in emission order.
    pub fn messages(&self) -> Vec<(Channel, String)> {
        self.lock().clone()
    }

    /// Messages sent on one channel.
    pub fn on(&self, channel: Channel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// All non-verbose text joined by newlines.
    pub fn transcript(&self) -> String {
        self.lock()
            .iter()
            .filter(|(c, _)| *c != Channel::Verbose)
            .map(|(_, m)| m.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&self, channel: Channel, message: &str) {
        self.lock().push((channel, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Channel, String)>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for RecordingOutput {
    fn success(&self, message: &str) {
        self.push(Channel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(Channel::Error, message);
    }

    fn info(&self, message: &str) {
        self.push(Channel::Info, message);
    }

    fn verbose(&self, message: &str) {
        self.push(Channel::Verbose, message);
    }
}
