//! engine::modes
//!
//! Which of the three things an invocation does.
//!
//! # Priority
//!
//! `--check` beats `--dry-run`; with neither flag the setting is applied.
//!
//! ```
//! use delete_branch_on_merge::engine::modes::Mode;
//!
//! assert_eq!(Mode::from_flags(true, true), Mode::Check);
//! assert_eq!(Mode::from_flags(false, true), Mode::DryRun);
//! assert_eq!(Mode::from_flags(false, false), Mode::Apply);
//! ```

/// Invocation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report the current setting; never writes.
    Check,
    /// Report what would change; never writes.
    DryRun,
    /// Enable the setting if needed and verify it.
    Apply,
}

impl Mode {
    /// Resolve the mode from CLI flags.
    pub fn from_flags(check_only: bool, dry_run: bool) -> Self {
        if check_only {
            Mode::Check
        } else if dry_run {
            Mode::DryRun
        } else {
            Mode::Apply
        }
    }

    /// Whether this mode may write to GitHub.
    pub fn is_mutating(self) -> bool {
        matches!(self, Mode::Apply)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Check => write!(f, "check"),
            Mode::DryRun => write!(f, "dry-run"),
            Mode::Apply => write!(f, "apply"),
        }
    }
}
