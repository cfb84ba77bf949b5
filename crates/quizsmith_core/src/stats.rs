//! Usage statistics types.

use serde::{Deserialize, Serialize};

/// Raw per-user aggregates from the interactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionTotals {
    /// Total interaction rows for the user.
    pub total_interactions: i64,
    /// Sum of tokens across all interactions.
    pub total_tokens: i64,
    /// Sum of durations across all interactions, in milliseconds.
    pub total_duration_ms: i64,
    /// Number of failed interactions.
    pub error_count: i64,
}

/// Per-user usage report composed from persistence aggregates and the
/// in-memory quota state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Total interaction rows for the user.
    pub total_interactions: i64,
    /// Sum of tokens across all interactions.
    pub total_tokens: i64,
    /// Mean upstream call duration in milliseconds (0 with no interactions).
    pub average_duration_ms: f64,
    /// Number of failed interactions.
    pub error_count: i64,
    /// Tokens left in today's quota window.
    pub remaining_daily_tokens: i64,
    /// The configured daily token budget.
    pub daily_token_limit: i64,
}
