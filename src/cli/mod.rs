//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Initialise logging
//! - Load configuration and resolve the token
//! - Own the tokio runtime and the per-invocation cancellation token
//! - Map failures to exit codes
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, wires the
//! [`crate::forge::GitHubClient`] and [`crate::ui::output::ConsoleOutput`]
//! together, and hands off to [`crate::engine::Controller`].

pub mod args;

pub use args::Cli;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::errors::{exit_code_of, find_app_error, AppError};
use crate::core::repo_ref::parse_repository;
use crate::core::types::TokenMetadata;
use crate::engine::{Controller, Mode};
use crate::forge::{GitHubApi, GitHubClient, RetryPolicy};
use crate::secrets::{CredentialSource, TokenResolver};
use crate::ui::output::{ConsoleOutput, OutputSink, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    debug!(%cli, "parsed arguments");

    let config = Config::load().context("failed to load configuration")?;
    if let Some(path) = config.loaded_from() {
        debug!(path = %path.display(), "loaded configuration");
    }

    let credentials = TokenResolver::new(cli.token.clone(), config.token().map(String::from));
    let output = ConsoleOutput::new(Verbosity::from_flag(cli.verbose));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cancel = CancellationToken::new();
        let watchdog = spawn_watchdog(cancel.clone(), config.timeout());
        let result = execute(&cli, &config, &credentials, &output, &cancel).await;
        watchdog.abort();
        result
    })?;

    Ok(())
}

/// One invocation after argument parsing and configuration loading.
///
/// The repository is parsed before the token is resolved, so malformed input
/// is reported as `InvalidArguments` even when no token is configured.
pub async fn execute(
    cli: &Cli,
    config: &Config,
    credentials: &dyn CredentialSource,
    output: &dyn OutputSink,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let repo = parse_repository(&cli.repository)?;
    let token = credentials.get_credential()?;

    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| AppError::general("Failed to build HTTP client").with_source(e))?;
    let client = GitHubClient::new(token)
        .with_http_client(http)
        .with_api_base(config.api_url())
        .with_retry_policy(RetryPolicy::new(
            config.max_attempts(),
            config.retry_base_delay(),
        ));
    debug!(?client, "created GitHub client");

    // Apply already uses all three calls; the identity lookup only rides
    // along with the read-only modes.
    if cli.verbose && !Mode::from_flags(cli.check, cli.dry_run).is_mutating() {
        describe_token(&client, output, cancel).await;
    }

    Controller::new(&client, output)
        .run(&repo, cli.check, cli.dry_run, cancel)
        .await
}

/// Exit code for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let dyn_err: &(dyn std::error::Error + 'static) = err.as_ref();
    u8::try_from(exit_code_of(Some(dyn_err))).unwrap_or(1)
}

/// User-facing text for a failed run.
///
/// An [`AppError`] anywhere in the chain is shown by its own message, which
/// already carries remediation text. Anything else is shown with its causes.
pub fn error_message(err: &anyhow::Error) -> String {
    let dyn_err: &(dyn std::error::Error + 'static) = err.as_ref();
    match find_app_error(dyn_err) {
        Some(app) => app.message().to_string(),
        None => format!("{:#}", err),
    }
}

/// Report who the token belongs to. Never fails the run.
async fn describe_token(api: &dyn GitHubApi, output: &dyn OutputSink, cancel: &CancellationToken) {
    match api.validate_token(cancel).await {
        Ok(identity) => report_identity(&identity, output),
        Err(err) => {
            debug!(error = %err, kind = %err.kind(), "token identity lookup failed");
            output.verbose(&format!("Could not identify the token owner ({})", err.kind()));
        }
    }
}

fn report_identity(identity: &TokenMetadata, output: &dyn OutputSink) {
    output.verbose(&format!("Authenticated as {}", identity.username));
    if identity.scopes.is_empty() {
        output.verbose("Token scopes: none reported");
    } else {
        output.verbose(&format!("Token scopes: {}", identity.scopes.join(", ")));
    }
}

/// Cancel `cancel` on Ctrl-C or once `deadline` has elapsed.
fn spawn_watchdog(cancel: CancellationToken, deadline: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(deadline) => {
                debug!(?deadline, "deadline elapsed, cancelling");
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                debug!("interrupted, cancelling");
            }
        }
        cancel.cancel();
    })
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` for this crate with
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,delete_branch_on_merge=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
