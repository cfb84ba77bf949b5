//! Rate limiting error types.

/// Which admission-control limit rejected a request.
///
/// User misbehavior, provider capacity, and cost containment are orthogonal
/// failure domains; the scope tag keeps them diagnosable independently.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum LimitScope {
    /// Per-user requests-per-minute window.
    #[strum(serialize = "requests_per_minute")]
    RequestsPerMinute,
    /// Per-provider requests-per-minute window.
    #[strum(serialize = "provider_rpm")]
    ProviderRpm,
    /// Per-user daily token budget.
    #[strum(serialize = "token_quota")]
    TokenQuota,
}

/// Error kinds for rate limiting operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// A rate or quota limit rejected the request.
    #[display("Rate limit exceeded ({}): {}", scope, message)]
    LimitExceeded {
        /// The limiter that tripped.
        scope: LimitScope,
        /// Human-readable detail.
        message: String,
    },
    /// Limiter configuration error.
    #[display("Configuration error: {}", _0)]
    Config(String),
}

/// Rate limiting error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizsmith_error::{LimitScope, RateLimitError, RateLimitErrorKind};
///
/// let err = RateLimitError::new(RateLimitErrorKind::LimitExceeded {
///     scope: LimitScope::TokenQuota,
///     message: "daily budget exhausted".to_string(),
/// });
/// assert_eq!(err.scope(), Some(LimitScope::TokenQuota));
/// assert!(format!("{}", err).contains("token_quota"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    /// The kind of error that occurred.
    pub kind: RateLimitErrorKind,
    /// Line number where the error was created.
    pub line: u32,
    /// File where the error was created.
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new RateLimitError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The scope of the limit that tripped, if this is a rejection.
    pub fn scope(&self) -> Option<LimitScope> {
        match &self.kind {
            RateLimitErrorKind::LimitExceeded { scope, .. } => Some(*scope),
            RateLimitErrorKind::Config(_) => None,
        }
    }
}
