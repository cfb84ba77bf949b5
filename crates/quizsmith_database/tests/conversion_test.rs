//! Tests for row-to-domain conversions.

use chrono::{NaiveDate, NaiveDateTime};
use quizsmith_core::{Generation, GenerationStatus, Model, Provider};
use quizsmith_database::{GenerationRow, ModelRow};
use uuid::Uuid;

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn model_row(provider: &str) -> ModelRow {
    ModelRow {
        id: 1,
        provider: provider.to_string(),
        model_name: "gpt-4o-mini".to_string(),
        settings: serde_json::json!({"temperature": "0.2"}),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

#[test]
fn model_row_with_known_provider_converts() {
    let model = Model::try_from(model_row("openai")).unwrap();
    assert_eq!(model.provider, Provider::OpenAi);
    assert_eq!(model.settings.get("temperature").unwrap(), "0.2");
    assert_eq!(model.temperature(), Some(0.2));
}

#[test]
fn model_row_with_unknown_provider_is_a_validation_error() {
    // Caught at load time, before any client dispatch or network call.
    let err = Model::try_from(model_row("cohere")).unwrap_err();
    assert!(err.to_string().contains("cohere"));
}

#[test]
fn model_row_with_non_string_settings_is_a_serialization_error() {
    let mut row = model_row("openai");
    row.settings = serde_json::json!({"temperature": 0.2});
    assert!(Model::try_from(row).is_err());
}

#[test]
fn generation_row_converts_status_and_params() {
    let row = GenerationRow {
        id: Uuid::new_v4(),
        user_id: 7,
        prompt_template_id: 3,
        input_params: serde_json::json!({"topic": "biology"}),
        generated_content: String::new(),
        status: "pending".to_string(),
        model_name: "gpt-4o-mini".to_string(),
        tokens_used: 0,
        duration_ms: 0,
        created_at: timestamp(),
    };

    let generation = Generation::try_from(row).unwrap();
    assert_eq!(generation.status, GenerationStatus::Pending);
    assert_eq!(generation.input_params.get("topic").unwrap(), "biology");
}

#[test]
fn generation_row_with_corrupt_status_is_rejected() {
    let row = GenerationRow {
        id: Uuid::new_v4(),
        user_id: 7,
        prompt_template_id: 3,
        input_params: serde_json::json!({}),
        generated_content: String::new(),
        status: "exploded".to_string(),
        model_name: "gpt-4o-mini".to_string(),
        tokens_used: 0,
        duration_ms: 0,
        created_at: timestamp(),
    };

    assert!(Generation::try_from(row).is_err());
}
