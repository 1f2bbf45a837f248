//! Bounded retry for ledger mutations.
//!
//! Only failures classified as transient are retried. The classifier is a pure
//! function over an error and its `source()` chain.

use log::warn;
use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::errors::{DatabaseError, Result};

/// Lowercase substrings that mark an error message as transient.
pub const TRANSIENT_MARKERS: [&str; 5] = ["timeout", "deadlock", "connection", "network", "transport"];

/// Linear backoff policy: attempt `n` waits `base_delay × n` before attempt `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Runs `op` until it succeeds, fails with a non-transient error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number and
    /// must build all per-attempt state itself.
    pub async fn run<F, Fut, T>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && is_transient_failure(&err) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} failed on attempt {}/{} with a transient error: {}. Retrying in {:?}",
                        operation, attempt, self.max_attempts, err, delay
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

/// Returns true if the error, or any error in its source chain, is a
/// timeout-class error or carries one of the [`TRANSIENT_MARKERS`] in its message.
pub fn is_transient_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if is_timeout_class(e) {
            return true;
        }
        let message = e.to_string().to_lowercase();
        if TRANSIENT_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = e.source();
    }
    false
}

fn is_timeout_class(err: &(dyn StdError + 'static)) -> bool {
    if let Some(db_err) = err.downcast_ref::<DatabaseError>() {
        return matches!(db_err, DatabaseError::Timeout(_));
    }
    if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
        return io_err.kind() == std::io::ErrorKind::TimedOut;
    }
    err.is::<tokio::time::error::Elapsed>()
}
