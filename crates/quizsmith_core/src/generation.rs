//! Generation records and provider output.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle state of a generation.
///
/// A generation is inserted `Pending` before the upstream call is made and
/// is finalized exactly once to `Completed` or `Failed`, never reopened.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Persisted, upstream call not yet completed.
    Pending,
    /// Upstream call succeeded; content and token counts are populated.
    Completed,
    /// Upstream call failed; content stays empty.
    Failed,
}

impl GenerationStatus {
    /// The lowercase storage name of this status.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One request/response cycle against an upstream provider, persisted as an
/// auditable record.
///
/// Invariant: `generated_content` and `tokens_used` are populated if and
/// only if `status` is [`GenerationStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Stable identifier, minted at insert time.
    pub id: Uuid,
    /// The requesting user.
    pub user_id: i64,
    /// The prompt template this generation rendered.
    pub prompt_template_id: i32,
    /// Parameters supplied for template rendering.
    pub input_params: HashMap<String, String>,
    /// Generated text; empty until completed.
    pub generated_content: String,
    /// Lifecycle state.
    pub status: GenerationStatus,
    /// Provider-side model identifier used.
    pub model_name: String,
    /// Total tokens consumed; zero until completed.
    pub tokens_used: i32,
    /// Wall-clock duration of the upstream call in milliseconds.
    pub duration_ms: i32,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields required to insert a new pending generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeneration {
    /// The requesting user.
    pub user_id: i64,
    /// The prompt template being rendered.
    pub prompt_template_id: i32,
    /// Parameters supplied for template rendering.
    pub input_params: HashMap<String, String>,
    /// Provider-side model identifier.
    pub model_name: String,
}

/// Successful output extracted from an upstream provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// The generated text.
    pub content: String,
    /// Prompt-side token count reported by the provider.
    pub input_tokens: i64,
    /// Completion-side token count reported by the provider.
    pub output_tokens: i64,
    /// Advisory cost estimate in USD; not authoritative billing.
    pub estimated_cost_usd: f64,
}

impl GenerationOutput {
    /// Total tokens consumed by the call.
    pub fn total_tokens(&self) -> i64 {
        self.input_tokens + self.output_tokens
    }
}
