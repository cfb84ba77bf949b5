//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, ProviderError, RateLimitError, ValidationError};

/// The foundation error enum for the Quizsmith workspace.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{ConfigError, QuizsmithError};
///
/// let err: QuizsmithError = ConfigError::new("bad limits").into();
/// assert!(format!("{}", err).contains("bad limits"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuizsmithErrorKind {
    /// Caller-correctable input problem.
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Admission control rejection.
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// Upstream provider failure.
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Persistence failure.
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Configuration failure.
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Quizsmith error with kind discrimination.
///
/// Boxed so `Result<T, QuizsmithError>` stays a single word wide.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{QuizsmithResult, ValidationError, ValidationErrorKind};
///
/// fn lookup() -> QuizsmithResult<()> {
///     Err(ValidationError::new(ValidationErrorKind::NotFound {
///         entity: "model",
///         id: "42".to_string(),
///     }))?
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Quizsmith Error: {}", _0)]
pub struct QuizsmithError(Box<QuizsmithErrorKind>);

impl QuizsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: QuizsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuizsmithErrorKind {
        &self.0
    }

    /// True when a missing record caused this error.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            QuizsmithErrorKind::Database(e) => e.is_not_found(),
            QuizsmithErrorKind::Validation(e) => {
                matches!(e.kind, crate::ValidationErrorKind::NotFound { .. })
            }
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to QuizsmithErrorKind.
impl<T> From<T> for QuizsmithError
where
    T: Into<QuizsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quizsmith operations.
pub type QuizsmithResult<T> = std::result::Result<T, QuizsmithError>;
