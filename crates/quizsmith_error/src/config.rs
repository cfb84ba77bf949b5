//! Configuration error types.

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizsmith_error::ConfigError;
///
/// let err = ConfigError::new("missing providers table");
/// assert!(format!("{}", err).contains("missing providers table"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Description of the configuration problem.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
