//! Upstream provider error types and retry classification.

use crate::RetryableError;

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// API key not found in the environment.
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Prompt template rendering failed.
    #[display("Template error: {}", _0)]
    Template(String),
    /// Model settings could not be applied.
    #[display("Invalid model settings: {}", _0)]
    InvalidSettings(String),
    /// HTTP transport failure (connection, DNS, timeout).
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Non-2xx API response, excluding rate limits.
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },
    /// 429-equivalent response from the provider.
    #[display("Provider rate limited: {}", _0)]
    RateLimited(String),
    /// Response body could not be parsed.
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Request DTO construction failed.
    #[display("Builder error: {}", _0)]
    Builder(String),
    /// The model names a provider with no configured client.
    #[display("No client configured for provider: {}", _0)]
    Unsupported(String),
    /// The request was cancelled before completion.
    #[display("Request cancelled")]
    Cancelled,
}

impl ProviderErrorKind {
    /// Check whether this error is a transient upstream condition.
    ///
    /// Classification only: the orchestrator treats the upstream call as
    /// at-most-once and never retries it, but callers and transports may.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Http(_) => true,
            ProviderErrorKind::RateLimited(_) => true,
            ProviderErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Api {
///     status: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let rate_limited = ProviderError::new(ProviderErrorKind::RateLimited(
///     "slow down".to_string(),
/// ));
/// assert!(rate_limited.is_rate_limited());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred.
    pub kind: ProviderErrorKind,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the provider rejected the call with a 429-equivalent.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ProviderErrorKind::RateLimited(_))
    }
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
