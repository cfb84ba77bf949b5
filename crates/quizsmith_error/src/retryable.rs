//! Retry classification for transient failures.

/// Trait for errors that support retry classification.
///
/// Transient infrastructure conditions (connection failures, serialization
/// conflicts, timeouts) should return `true`; caller-correctable or
/// permanent conditions (not found, constraint violations, bad requests)
/// should return `false`.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{DatabaseError, DatabaseErrorKind, RetryableError};
///
/// let transient = DatabaseError::new(DatabaseErrorKind::Connection(
///     "connection refused".to_string(),
/// ));
/// assert!(transient.is_retryable());
///
/// let permanent = DatabaseError::new(DatabaseErrorKind::NotFound);
/// assert!(!permanent.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}
