//! Conversions between database rows and domain types.

use crate::rows::{
    FeedbackRow, GenerationRow, InteractionRow, ModelRow, NewFeedbackRow, NewInteractionRow,
    PromptTemplateRow,
};
use quizsmith_core::{
    Feedback, Generation, GenerationStatus, Interaction, Model, NewFeedback, NewInteraction,
    PromptTemplate, Provider,
};
use quizsmith_error::{
    DatabaseError, DatabaseErrorKind, QuizsmithError, ValidationError, ValidationErrorKind,
};
use std::collections::HashMap;
use std::str::FromStr;

/// Decode a Jsonb column holding a string-to-string map.
pub(crate) fn string_map_from_json(
    value: serde_json::Value,
    column: &str,
) -> Result<HashMap<String, String>, DatabaseError> {
    serde_json::from_value(value).map_err(|e| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "column {column} does not hold a string map: {e}"
        )))
    })
}

/// Encode a string-to-string map for a Jsonb column.
pub(crate) fn json_from_string_map(map: &HashMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

fn parse_status(raw: &str) -> Result<GenerationStatus, DatabaseError> {
    GenerationStatus::from_str(raw).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "unrecognized status value '{raw}'"
        )))
    })
}

impl TryFrom<ModelRow> for Model {
    type Error = QuizsmithError;

    fn try_from(row: ModelRow) -> Result<Self, Self::Error> {
        // An unsupported provider string is caught here, before any client
        // dispatch or network call.
        let provider = Provider::from_str(&row.provider).map_err(|_| {
            ValidationError::new(ValidationErrorKind::UnknownProvider(row.provider.clone()))
        })?;
        let settings = string_map_from_json(row.settings, "models.settings")?;
        Ok(Model {
            id: row.id,
            provider,
            model_name: row.model_name,
            settings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<PromptTemplateRow> for PromptTemplate {
    fn from(row: PromptTemplateRow) -> Self {
        PromptTemplate {
            id: row.id,
            name: row.name,
            category: row.category,
            template_text: row.template_text,
            parameters: row.parameters,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<GenerationRow> for Generation {
    type Error = QuizsmithError;

    fn try_from(row: GenerationRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let input_params = string_map_from_json(row.input_params, "generations.input_params")?;
        Ok(Generation {
            id: row.id,
            user_id: row.user_id,
            prompt_template_id: row.prompt_template_id,
            input_params,
            generated_content: row.generated_content,
            status,
            model_name: row.model_name,
            tokens_used: row.tokens_used,
            duration_ms: row.duration_ms,
            created_at: row.created_at,
        })
    }
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Feedback {
            id: row.id,
            generation_id: row.generation_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

impl From<NewFeedback> for NewFeedbackRow {
    fn from(new: NewFeedback) -> Self {
        NewFeedbackRow {
            generation_id: new.generation_id,
            user_id: new.user_id,
            rating: new.rating,
            comment: new.comment,
        }
    }
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = QuizsmithError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        Ok(Interaction {
            id: row.id,
            user_id: row.user_id,
            model_name: row.model_name,
            interaction_type: row.interaction_type,
            input_summary: row.input_summary,
            output_summary: row.output_summary,
            tokens_used: row.tokens_used,
            duration_ms: row.duration_ms,
            status,
            error_message: row.error_message,
            created_at: row.created_at,
        })
    }
}

impl From<NewInteraction> for NewInteractionRow {
    fn from(new: NewInteraction) -> Self {
        NewInteractionRow {
            user_id: new.user_id,
            model_name: new.model_name,
            interaction_type: new.interaction_type,
            input_summary: new.input_summary,
            output_summary: new.output_summary,
            tokens_used: new.tokens_used,
            duration_ms: new.duration_ms,
            status: new.status.as_str().to_string(),
            error_message: new.error_message,
        }
    }
}
