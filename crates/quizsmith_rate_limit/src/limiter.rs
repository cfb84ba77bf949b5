//! Rate limiter implementation using governor plus per-user quota accounting.

use crate::LimitSettings;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::keyed::DashMapStateStore;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use quizsmith_core::{Clock, Provider};
use quizsmith_error::{LimitScope, RateLimitError, RateLimitErrorKind};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

// Per-user keyed limiter and per-provider direct limiters.
type UserRateLimiter = GovernorRateLimiter<i64, DashMapStateStore<i64>, DefaultClock>;
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Daily token usage for one user.
#[derive(Debug, Clone, Copy)]
struct QuotaWindow {
    used: i64,
    day: NaiveDate,
}

impl QuotaWindow {
    /// Reinitialize the counter on the first access after a UTC day
    /// boundary crossing.
    fn roll(&mut self, today: NaiveDate) {
        if self.day != today {
            self.day = today;
            self.used = 0;
        }
    }
}

/// Admission control over user RPM, provider RPM, and daily token budgets.
///
/// Counters are in-memory and process-local: a restart resets them. That is
/// acceptable because the quota is a soft operational guard, not a billing
/// ledger (the durable ledger is the generations/interactions tables). A
/// multi-instance deployment enforces these limits per instance; operators
/// must either sticky-route users to instances or accept a proportionally
/// higher effective limit unless the limiter is backed by a shared store.
///
/// Check-and-increment is a single atomic operation per key: governor's
/// GCRA state for the RPM limits, and a per-user mutex for the token
/// quota — so unrelated users never serialize against each other.
pub struct RateLimiter {
    settings: LimitSettings,
    user_rpm: UserRateLimiter,
    provider_rpm: HashMap<Provider, DirectRateLimiter>,
    quotas: Mutex<HashMap<i64, Arc<Mutex<QuotaWindow>>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Create a limiter from validated settings and an injected clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any limit is zero.
    pub fn new(settings: LimitSettings, clock: Arc<dyn Clock>) -> Result<Self, RateLimitError> {
        settings.validate()?;

        let user_quota = NonZeroU32::new(settings.user_requests_per_minute).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::Config(
                "user_requests_per_minute must be positive".to_string(),
            ))
        })?;
        let user_rpm = GovernorRateLimiter::keyed(Quota::per_minute(user_quota));

        let mut provider_rpm = HashMap::new();
        for (provider, rpm) in &settings.provider_rpm {
            let quota = NonZeroU32::new(*rpm).ok_or_else(|| {
                RateLimitError::new(RateLimitErrorKind::Config(format!(
                    "provider_rpm for {provider} must be positive"
                )))
            })?;
            provider_rpm.insert(*provider, GovernorRateLimiter::direct(Quota::per_minute(quota)));
        }

        Ok(Self {
            settings,
            user_rpm,
            provider_rpm,
            quotas: Mutex::new(HashMap::new()),
            clock,
        })
    }

    /// Admit or reject a request against the user's per-minute window.
    #[instrument(skip(self))]
    pub fn allow_request(&self, user_id: i64) -> Result<(), RateLimitError> {
        self.user_rpm.check_key(&user_id).map_err(|_| {
            debug!(user_id, "User request rate limit tripped");
            RateLimitError::new(RateLimitErrorKind::LimitExceeded {
                scope: LimitScope::RequestsPerMinute,
                message: format!(
                    "user {user_id} exceeded {} requests per minute",
                    self.settings.user_requests_per_minute
                ),
            })
        })
    }

    /// Admit or reject a request against the provider's per-minute window.
    ///
    /// Providers without a configured limit are admitted.
    #[instrument(skip(self))]
    pub fn allow_provider_request(&self, provider: Provider) -> Result<(), RateLimitError> {
        let Some(limiter) = self.provider_rpm.get(&provider) else {
            debug!(%provider, "No RPM limit configured for provider, admitting");
            return Ok(());
        };
        limiter.check().map_err(|_| {
            debug!(%provider, "Provider request rate limit tripped");
            RateLimitError::new(RateLimitErrorKind::LimitExceeded {
                scope: LimitScope::ProviderRpm,
                message: format!("provider {provider} request rate exceeded"),
            })
        })
    }

    /// Compare `requested` tokens against the user's remaining daily budget
    /// without debiting.
    #[instrument(skip(self))]
    pub fn check_token_quota(&self, user_id: i64, requested: i64) -> Result<(), RateLimitError> {
        let entry = self.quota_entry(user_id);
        let mut window = entry.lock().expect("quota lock poisoned");
        window.roll(self.today());
        if window.used + requested > self.settings.user_tokens_per_day {
            return Err(self.quota_exceeded(user_id, window.used, requested));
        }
        Ok(())
    }

    /// Atomically check and debit the user's daily budget.
    ///
    /// The debit happens even when the charge pushes usage over the limit:
    /// by the time this is called the upstream cost has already been
    /// incurred, so the ledger must reflect it. The returned error tells
    /// the caller the budget is exhausted for further requests.
    #[instrument(skip(self))]
    pub fn charge_tokens(&self, user_id: i64, tokens: i64) -> Result<(), RateLimitError> {
        let entry = self.quota_entry(user_id);
        let mut window = entry.lock().expect("quota lock poisoned");
        window.roll(self.today());
        window.used += tokens;
        if window.used > self.settings.user_tokens_per_day {
            return Err(self.quota_exceeded(user_id, window.used - tokens, tokens));
        }
        Ok(())
    }

    /// Debit the user's daily budget without an admission check.
    #[instrument(skip(self))]
    pub fn record_token_usage(&self, user_id: i64, tokens: i64) {
        let entry = self.quota_entry(user_id);
        let mut window = entry.lock().expect("quota lock poisoned");
        window.roll(self.today());
        window.used += tokens;
    }

    /// Tokens left in the user's current daily window.
    pub fn remaining_tokens(&self, user_id: i64) -> i64 {
        let entry = self.quota_entry(user_id);
        let mut window = entry.lock().expect("quota lock poisoned");
        window.roll(self.today());
        (self.settings.user_tokens_per_day - window.used).max(0)
    }

    /// The configured daily token budget.
    pub fn daily_token_limit(&self) -> i64 {
        self.settings.user_tokens_per_day
    }

    fn today(&self) -> NaiveDate {
        self.clock.now_utc().date_naive()
    }

    /// Fetch or create the quota entry for a user.
    ///
    /// The map lock is released before the per-user lock is taken, so quota
    /// enforcement serializes per user, not across the whole limiter.
    fn quota_entry(&self, user_id: i64) -> Arc<Mutex<QuotaWindow>> {
        let today = self.today();
        let mut quotas = self.quotas.lock().expect("quota map lock poisoned");
        Arc::clone(quotas.entry(user_id).or_insert_with(|| {
            Arc::new(Mutex::new(QuotaWindow {
                used: 0,
                day: today,
            }))
        }))
    }

    fn quota_exceeded(&self, user_id: i64, used: i64, requested: i64) -> RateLimitError {
        debug!(user_id, used, requested, "Daily token quota tripped");
        RateLimitError::new(RateLimitErrorKind::LimitExceeded {
            scope: LimitScope::TokenQuota,
            message: format!(
                "user {user_id} daily token quota exhausted: {used} used of {}, {requested} requested",
                self.settings.user_tokens_per_day
            ),
        })
    }
}
