//! Prompt template records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A reusable prompt template with declared parameters.
///
/// `template_text` uses `{{name}}` placeholders filled from a
/// string-to-string parameter map; see [`crate::template::render_prompt`].
/// `parameters` lists the names a caller must supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Database identifier.
    pub id: i32,
    /// Human-readable template name.
    pub name: String,
    /// Grouping category (e.g. "multiple_choice", "flashcard").
    pub category: String,
    /// Template body with `{{name}}` placeholders.
    pub template_text: String,
    /// Declared parameter names the caller must provide.
    pub parameters: Vec<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
}
