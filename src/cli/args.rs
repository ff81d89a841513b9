//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--check` / `-c`: Report the current setting without changing it
//! - `--dry-run` / `-d`: Show what would change without changing it
//! - `--verbose` / `-v`: Progress notes and debug logging on stderr
//! - `--token` / `-t`: GitHub token; overrides the environment and config file
//! - `--help` / `-h`, `--version`

use clap::Parser;

/// Enable GitHub's "automatically delete head branches" setting for a repository
#[derive(Parser, Debug)]
#[command(name = "delete-branch-on-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
REPOSITORY FORMATS:
  owner/repo
  https://github.com/owner/repo[.git]
  git@github.com:owner/repo[.git]

EXIT CODES:
  0  success
  1  general error
  2  invalid arguments
  3  authentication failed
  4  insufficient permissions
  5  repository not found
  6  rate limited")]
pub struct Cli {
    /// Repository to configure (owner/repo, HTTPS URL or SSH URL)
    pub repository: String,

    /// Only report whether the setting is enabled
    #[arg(short, long)]
    pub check: bool,

    /// Show what would change without changing anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Print progress notes and debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// GitHub token (default: $GITHUB_TOKEN, then $GH_TOKEN, then the config file)
    #[arg(short, long, value_name = "TOKEN")]
    pub token: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Usage errors exit with code 2; `--help` and `--version` exit with 0.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

impl std::fmt::Display for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "repository={} check={} dry_run={} verbose={} token={}",
            self.repository,
            self.check,
            self.dry_run,
            self.verbose,
            if self.token.is_some() { "[REDACTED]" } else { "unset" }
        )
    }
}
