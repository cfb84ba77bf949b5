//! Limit configuration.

use quizsmith_core::Provider;
use quizsmith_error::{RateLimitError, RateLimitErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rate and quota limits for the generation core.
///
/// Loaded from the `[limits]` table of `quizsmith.toml`:
///
/// ```toml
/// [limits]
/// user_requests_per_minute = 20
/// user_tokens_per_day = 100_000
///
/// [limits.provider_rpm]
/// openai = 60
/// anthropic = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitSettings {
    /// Requests admitted per user per rolling minute.
    pub user_requests_per_minute: u32,

    /// Token budget per user per UTC day.
    pub user_tokens_per_day: i64,

    /// Requests admitted per provider per rolling minute.
    ///
    /// Providers absent from this map are not throttled.
    #[serde(default)]
    pub provider_rpm: HashMap<Provider, u32>,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            user_requests_per_minute: 20,
            user_tokens_per_day: 100_000,
            provider_rpm: HashMap::from([(Provider::OpenAi, 60), (Provider::Anthropic, 50)]),
        }
    }
}

impl LimitSettings {
    /// Check that every configured limit is enforceable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for zero limits, which would reject
    /// every request.
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.user_requests_per_minute == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::Config(
                "user_requests_per_minute must be positive".to_string(),
            )));
        }
        if self.user_tokens_per_day <= 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::Config(
                "user_tokens_per_day must be positive".to_string(),
            )));
        }
        for (provider, rpm) in &self.provider_rpm {
            if *rpm == 0 {
                return Err(RateLimitError::new(RateLimitErrorKind::Config(format!(
                    "provider_rpm for {provider} must be positive"
                ))));
            }
        }
        Ok(())
    }
}
