//! Append-only audit rows for upstream call attempts.

use crate::GenerationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One audit row per upstream call attempt.
///
/// Interactions are append-only: together with the generations table they
/// form the durable usage ledger (the in-memory quota counters are only a
/// soft operational guard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Database identifier.
    pub id: i32,
    /// The requesting user.
    pub user_id: i64,
    /// Provider-side model identifier used.
    pub model_name: String,
    /// What kind of call this was (e.g. "content_generation").
    pub interaction_type: String,
    /// Truncated summary of the input.
    pub input_summary: String,
    /// Truncated summary of the output, if any was produced.
    pub output_summary: Option<String>,
    /// Total tokens consumed by the attempt.
    pub tokens_used: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: i32,
    /// Outcome of the attempt (completed or failed).
    pub status: GenerationStatus,
    /// Error message when the attempt failed.
    pub error_message: Option<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields required to append a new interaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    /// The requesting user.
    pub user_id: i64,
    /// Provider-side model identifier used.
    pub model_name: String,
    /// What kind of call this was.
    pub interaction_type: String,
    /// Truncated summary of the input.
    pub input_summary: String,
    /// Truncated summary of the output, if any was produced.
    pub output_summary: Option<String>,
    /// Total tokens consumed by the attempt.
    pub tokens_used: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: i32,
    /// Outcome of the attempt (completed or failed).
    pub status: GenerationStatus,
    /// Error message when the attempt failed.
    pub error_message: Option<String>,
}
