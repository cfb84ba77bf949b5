//! Bounded-retry execution with exponential backoff.
//!
//! Persistence calls run through [`with_retry`], which retries transient
//! infrastructure failures (as classified by
//! [`quizsmith_error::RetryableError`]) with exponential backoff and honors
//! cancellation before every attempt and during every backoff sleep.

use quizsmith_error::RetryableError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Bounds for retrying transient persistence failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
        }
    }
}

impl RetryPolicy {
    /// The base delay as a [`Duration`].
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// How a retried operation ultimately failed.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The cancellation token fired before or between attempts.
    Cancelled,
    /// A non-retryable error ended execution on the attempt that hit it.
    Attempt(E),
    /// A retryable error persisted through every attempt.
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The underlying operation error, if one was observed.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Attempt(e) => Some(e),
            RetryError::Exhausted { source, .. } => Some(source),
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryError::Cancelled => write!(f, "operation cancelled before completion"),
            RetryError::Attempt(e) => write!(f, "{}", e),
            RetryError::Exhausted { attempts, source } => {
                write!(f, "max retry attempts ({}) reached: {}", attempts, source)
            }
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Run `op` up to `max_attempts` times with exponential backoff.
///
/// Before every attempt (including the first) the cancellation token is
/// checked; a cancelled token returns [`RetryError::Cancelled`] with zero
/// further attempts. After a failing attempt the error is classified:
/// non-retryable errors return immediately, retryable errors sleep
/// `base_delay * 2^(attempt - 1)` (attempt is 1-indexed) and try again
/// until attempts are exhausted. The backoff sleep races the cancellation
/// token so an expiring request never waits out a full backoff.
///
/// # Examples
///
/// ```
/// use quizsmith_database::{with_retry, RetryError};
/// use quizsmith_error::{DatabaseError, DatabaseErrorKind};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cancel = CancellationToken::new();
/// let result: Result<u32, RetryError<DatabaseError>> = with_retry(
///     &cancel,
///     || async { Ok(7) },
///     3,
///     Duration::from_millis(10),
/// )
/// .await;
/// assert_eq!(result.unwrap(), 7);
/// # }
/// ```
pub async fn with_retry<T, E, F, Fut>(
    cancel: &CancellationToken,
    mut op: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, RetryError<E>>
where
    E: RetryableError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(RetryError::Attempt(e)),
            Err(e) => {
                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted {
                        attempts: max_attempts,
                        source: e,
                    });
                }
                let backoff = base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    attempt,
                    max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Transient error, will retry"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                    _ = tokio::time::sleep(backoff) => {}
                }
                attempt += 1;
            }
        }
    }
}
