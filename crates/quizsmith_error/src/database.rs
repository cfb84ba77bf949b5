//! Database error types and categorization.

use crate::RetryableError;

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection failed, was refused, or was shut down underneath us.
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// Serialization failure, deadlock, or lock contention.
    #[display("Serialization failure: {}", _0)]
    Serialization(String),
    /// Query or statement timed out.
    #[display("Database timeout: {}", _0)]
    Timeout(String),
    /// Query execution failed.
    #[display("Database query error: {}", _0)]
    Query(String),
    /// Record not found.
    #[display("Record not found")]
    NotFound,
    /// Unique constraint violation.
    #[display("Conflict: {}", _0)]
    Conflict(String),
    /// Foreign key constraint violation.
    #[display("Constraint violation: {}", _0)]
    Constraint(String),
    /// The operation was cancelled before it ran.
    #[display("Operation cancelled")]
    Cancelled,
    /// A transient failure persisted through every retry attempt.
    #[display("Max retry attempts ({}) reached: {}", attempts, last)]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The final underlying error.
        last: String,
    },
    /// Migration error.
    #[display("Migration error: {}", _0)]
    Migration(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::NotFound);
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred.
    pub kind: DatabaseErrorKind,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the underlying record was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::NotFound)
    }
}

impl RetryableError for DatabaseError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::Connection(_)
                | DatabaseErrorKind::Serialization(_)
                | DatabaseErrorKind::Timeout(_)
        )
    }
}

// Diesel error categorization (only available with the database feature).
//
// Maps low-level storage errors to semantic kinds: missing rows become
// NotFound, unique violations become Conflict, foreign key violations
// become Constraint, cancelled statements become Timeout. Unrecognized
// errors pass through as Query with their original message.
#[cfg(feature = "database")]
impl From<diesel::result::Error> for DatabaseError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::DatabaseErrorKind as DieselKind;
        use diesel::result::Error as DieselError;

        match err {
            DieselError::NotFound => DatabaseError::new(DatabaseErrorKind::NotFound),
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let mapped = match kind {
                    DieselKind::UniqueViolation => DatabaseErrorKind::Conflict(message),
                    DieselKind::ForeignKeyViolation => DatabaseErrorKind::Constraint(message),
                    DieselKind::SerializationFailure => DatabaseErrorKind::Serialization(message),
                    DieselKind::ClosedConnection | DieselKind::UnableToSendCommand => {
                        DatabaseErrorKind::Connection(message)
                    }
                    _ => categorize_message(message),
                };
                DatabaseError::new(mapped)
            }
            other => DatabaseError::new(DatabaseErrorKind::Query(other.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for DatabaseError {
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

/// Categorize a Postgres error message that diesel reports as `Unknown`.
///
/// Postgres surfaces deadlocks, lock timeouts, statement cancellation, and
/// admin shutdown through SQLSTATE classes diesel does not model; the
/// message text is the remaining discriminator.
#[cfg(feature = "database")]
fn categorize_message(message: String) -> DatabaseErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("deadlock") || lower.contains("lock not available") {
        DatabaseErrorKind::Serialization(message)
    } else if lower.contains("canceling statement")
        || lower.contains("statement timeout")
        || lower.contains("deadline exceeded")
    {
        DatabaseErrorKind::Timeout(message)
    } else if lower.contains("terminating connection")
        || lower.contains("shutdown")
        || lower.contains("connection refused")
        || lower.contains("connection reset")
    {
        DatabaseErrorKind::Connection(message)
    } else {
        DatabaseErrorKind::Query(message)
    }
}
