//! forge::retry
//!
//! Bounded linear retry for transient API failures.
//!
//! # Schedule
//!
//! With `max_attempts = 3` and `base_delay = 1s`: attempt 1, wait 1s,
//! attempt 2, wait 2s, attempt 3, give up. Only [`Failure::Transient`]
//! failures are retried. A fired cancellation token aborts the wait at once.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::config::schema::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS};
use crate::core::errors::AppError;

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts in total, first try included. Never less than 1.
    pub max_attempts: u32,
    /// Linear backoff unit.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Wait before the attempt that follows failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub enum Failure {
    /// Server error or transport failure; worth another attempt.
    Transient(AppError),
    /// Anything else; returned immediately.
    Fatal(AppError),
}

/// Run `op` until it succeeds, fails fatally, or attempts run out.
///
/// `op` receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    let mut attempt = 1;
    loop {
        let err = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(Failure::Fatal(err)) => return Err(err),
            Err(Failure::Transient(err)) => err,
        };

        if cancel.is_cancelled() {
            debug!(attempt, error = %err, "cancelled after transient failure");
            return Err(AppError::cancelled().with_source(err));
        }
        if attempt >= policy.max_attempts {
            debug!(attempt, error = %err, "giving up after transient failure");
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        debug!(attempt, ?delay, error = %err, "retrying after transient failure");
        tokio::select! {
            _ = cancel.cancelled() => return Err(AppError::cancelled().with_source(err)),
            _ = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}
