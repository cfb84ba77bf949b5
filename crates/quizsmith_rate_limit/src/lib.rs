//! Admission control for the Quizsmith generation core.
//!
//! Three independent limiters guard generation requests:
//! - per-user requests per minute,
//! - per-provider requests per minute,
//! - per-user daily token budget (UTC day window).
//!
//! User misbehavior, provider capacity, and cost containment are orthogonal
//! failure domains, so each limiter is tunable and diagnosable on its own;
//! rejections carry a [`quizsmith_error::LimitScope`] tag identifying which
//! one tripped.
//!
//! RPM enforcement uses the governor crate (GCRA algorithm); the daily
//! token budget keeps its own per-user accounting because it needs
//! check-and-debit of arbitrary token amounts and a day-boundary reset,
//! neither of which GCRA models.

mod limiter;
mod settings;

pub use limiter::RateLimiter;
pub use settings::LimitSettings;
