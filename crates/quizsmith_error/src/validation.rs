//! Validation error types.

/// Validation error conditions.
///
/// Validation errors are caller-correctable and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// A referenced entity does not exist.
    #[display("{} not found: {}", entity, id)]
    NotFound {
        /// Entity name (e.g. "model", "prompt template").
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },
    /// A value fell outside its permitted range.
    #[display("Value out of range: {}", _0)]
    OutOfRange(String),
    /// Prompt template rendering failed.
    #[display("Template error: {}", _0)]
    Template(String),
    /// A model row names a provider this system does not support.
    #[display("Unknown provider: {}", _0)]
    UnknownProvider(String),
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::UnknownProvider(
///     "cohere".to_string(),
/// ));
/// assert!(format!("{}", err).contains("cohere"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred.
    pub kind: ValidationErrorKind,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
