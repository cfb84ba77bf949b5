//! User feedback on generations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user rating attached to a completed generation.
///
/// Many feedback rows may reference one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Database identifier.
    pub id: i32,
    /// The generation being rated.
    pub generation_id: Uuid,
    /// The rating user.
    pub user_id: i64,
    /// Rating in 1..=5.
    pub rating: i32,
    /// Optional free-form comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields required to insert new feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    /// The generation being rated.
    pub generation_id: Uuid,
    /// The rating user.
    pub user_id: i64,
    /// Rating in 1..=5.
    pub rating: i32,
    /// Optional free-form comment.
    pub comment: Option<String>,
}
