//! Bounded retry for writes that hit a locked database.
//!
//! Another process (the CLI or the protocol server) may hold the write lock.
//! SQLite's busy timeout absorbs most of that; whatever still surfaces as
//! [`DbError::Contention`] is retried here with doubling backoff.

use std::future::Future;
use std::time::Duration;

use crate::db::{DbError, DbResult};

/// How often and how patiently contended writes are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }
}

/// Run `op` until it succeeds, fails with a non-contention error, or the
/// policy runs out of attempts. Each call of `op` must be a complete unit of
/// work (one statement or one transaction).
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, operation: &str, mut op: F) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut attempt = 1;
    let mut delay = policy.base_delay;

    loop {
        match op().await {
            Err(err) if err.is_contention() && attempt < policy.max_attempts => {
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Database busy, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err @ DbError::Contention { .. }) => {
                tracing::error!(operation, attempts = attempt, "Giving up on busy database");
                return Err(err);
            }
            other => return other,
        }
    }
}
