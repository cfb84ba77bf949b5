//! Diesel models for the generation core tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

/// Database row for the models table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::models)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ModelRow {
    pub id: i32,
    pub provider: String,
    pub model_name: String,
    pub settings: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the models table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::models)]
pub struct NewModelRow {
    pub provider: String,
    pub model_name: String,
    pub settings: serde_json::Value,
}

/// Changeset for updating a model row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::models)]
pub struct UpdateModelRow {
    pub provider: Option<String>,
    pub model_name: Option<String>,
    pub settings: Option<serde_json::Value>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Database row for the prompt_templates table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::prompt_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PromptTemplateRow {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub template_text: String,
    pub parameters: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the prompt_templates table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::prompt_templates)]
pub struct NewPromptTemplateRow {
    pub name: String,
    pub category: String,
    pub template_text: String,
    pub parameters: Vec<String>,
}

/// Changeset for updating a prompt template row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::prompt_templates)]
pub struct UpdatePromptTemplateRow {
    pub name: Option<String>,
    pub category: Option<String>,
    pub template_text: Option<String>,
    pub parameters: Option<Vec<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Database row for the generations table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::generations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRow {
    pub id: Uuid,
    pub user_id: i64,
    pub prompt_template_id: i32,
    pub input_params: serde_json::Value,
    pub generated_content: String,
    pub status: String,
    pub model_name: String,
    pub tokens_used: i32,
    pub duration_ms: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the generations table.
///
/// The id is minted by the caller so a retried insert after an ambiguous
/// failure conflicts instead of creating a second row. Content, token
/// count, and duration stay at their column defaults until finalization.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::generations)]
pub struct NewGenerationRow {
    pub id: Uuid,
    pub user_id: i64,
    pub prompt_template_id: i32,
    pub input_params: serde_json::Value,
    pub status: String,
    pub model_name: String,
}

/// Changeset for finalizing a generation row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::generations)]
pub struct UpdateGenerationRow {
    pub generated_content: Option<String>,
    pub status: Option<String>,
    pub tokens_used: Option<i32>,
    pub duration_ms: Option<i32>,
}

/// Database row for the feedbacks table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(belongs_to(GenerationRow, foreign_key = generation_id))]
#[diesel(table_name = crate::schema::feedbacks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    pub id: i32,
    pub generation_id: Uuid,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the feedbacks table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::feedbacks)]
pub struct NewFeedbackRow {
    pub generation_id: Uuid,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Database row for the interactions table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::interactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InteractionRow {
    pub id: i32,
    pub user_id: i64,
    pub model_name: String,
    pub interaction_type: String,
    pub input_summary: String,
    pub output_summary: Option<String>,
    pub tokens_used: i32,
    pub duration_ms: i32,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the interactions table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::interactions)]
pub struct NewInteractionRow {
    pub user_id: i64,
    pub model_name: String,
    pub interaction_type: String,
    pub input_summary: String,
    pub output_summary: Option<String>,
    pub tokens_used: i32,
    pub duration_ms: i32,
    pub status: String,
    pub error_message: Option<String>,
}
