//! Shared test doubles for orchestrator tests.

use async_trait::async_trait;
use chrono::Utc;
use quizsmith::{ContentStore, ProviderClient};
use quizsmith_core::{
    Feedback, Generation, GenerationOutput, GenerationStatus, Interaction, InteractionTotals,
    Model, NewFeedback, NewGeneration, NewInteraction, PromptTemplate, Provider,
};
use quizsmith_error::{DatabaseError, DatabaseErrorKind, ProviderError, QuizsmithResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn not_found() -> quizsmith_error::QuizsmithError {
    DatabaseError::new(DatabaseErrorKind::NotFound).into()
}

/// In-memory [`ContentStore`] with the same lifecycle rules as the
/// PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryStore {
    pub models: Mutex<HashMap<i32, Model>>,
    pub templates: Mutex<HashMap<i32, PromptTemplate>>,
    pub generations: Mutex<HashMap<Uuid, Generation>>,
    pub feedbacks: Mutex<Vec<Feedback>>,
    pub interactions: Mutex<Vec<Interaction>>,
    /// When set, complete_generation fails with a connection error.
    pub fail_completion: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_model(&self, model: Model) {
        self.models.lock().unwrap().insert(model.id, model);
    }

    pub fn insert_template(&self, template: PromptTemplate) {
        self.templates.lock().unwrap().insert(template.id, template);
    }

    pub fn generation_count(&self) -> usize {
        self.generations.lock().unwrap().len()
    }

    pub fn generation(&self, id: Uuid) -> Generation {
        self.generations.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn sole_generation(&self) -> Generation {
        let generations = self.generations.lock().unwrap();
        assert_eq!(generations.len(), 1, "expected exactly one generation");
        generations.values().next().cloned().unwrap()
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.interactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn get_model(&self, id: i32, _cancel: &CancellationToken) -> QuizsmithResult<Model> {
        self.models
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_prompt_template(
        &self,
        id: i32,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<PromptTemplate> {
        self.templates
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_generation(
        &self,
        new: NewGeneration,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        let generation = Generation {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            prompt_template_id: new.prompt_template_id,
            input_params: new.input_params,
            generated_content: String::new(),
            status: GenerationStatus::Pending,
            model_name: new.model_name,
            tokens_used: 0,
            duration_ms: 0,
            created_at: Utc::now().naive_utc(),
        };
        self.generations
            .lock()
            .unwrap()
            .insert(generation.id, generation.clone());
        Ok(generation)
    }

    async fn complete_generation(
        &self,
        id: Uuid,
        output: &GenerationOutput,
        duration_ms: i32,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        if self.fail_completion.load(Ordering::SeqCst) {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection(
                "connection refused".to_string(),
            ))
            .into());
        }
        let mut generations = self.generations.lock().unwrap();
        let generation = generations.get_mut(&id).ok_or_else(not_found)?;
        if generation.status != GenerationStatus::Pending {
            return Err(DatabaseError::new(DatabaseErrorKind::Conflict(format!(
                "generation {id} is not pending"
            )))
            .into());
        }
        generation.status = GenerationStatus::Completed;
        generation.generated_content = output.content.clone();
        generation.tokens_used = output.total_tokens() as i32;
        generation.duration_ms = duration_ms;
        Ok(generation.clone())
    }

    async fn fail_generation(
        &self,
        id: Uuid,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        let mut generations = self.generations.lock().unwrap();
        let generation = generations.get_mut(&id).ok_or_else(not_found)?;
        if generation.status != GenerationStatus::Pending {
            return Err(DatabaseError::new(DatabaseErrorKind::Conflict(format!(
                "generation {id} is not pending"
            )))
            .into());
        }
        generation.status = GenerationStatus::Failed;
        Ok(generation.clone())
    }

    async fn get_generation(
        &self,
        id: Uuid,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        self.generations
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn save_feedback(
        &self,
        new: NewFeedback,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<Feedback> {
        let generations = self.generations.lock().unwrap();
        if !generations.contains_key(&new.generation_id) {
            return Err(not_found());
        }
        let mut feedbacks = self.feedbacks.lock().unwrap();
        let feedback = Feedback {
            id: feedbacks.len() as i32 + 1,
            generation_id: new.generation_id,
            user_id: new.user_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now().naive_utc(),
        };
        feedbacks.push(feedback.clone());
        Ok(feedback)
    }

    async fn record_interaction(
        &self,
        new: NewInteraction,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<()> {
        let mut interactions = self.interactions.lock().unwrap();
        let interaction = Interaction {
            id: interactions.len() as i32 + 1,
            user_id: new.user_id,
            model_name: new.model_name,
            interaction_type: new.interaction_type,
            input_summary: new.input_summary,
            output_summary: new.output_summary,
            tokens_used: new.tokens_used,
            duration_ms: new.duration_ms,
            status: new.status,
            error_message: new.error_message,
            created_at: Utc::now().naive_utc(),
        };
        interactions.push(interaction);
        Ok(())
    }

    async fn user_interaction_stats(
        &self,
        user_id: i64,
        _cancel: &CancellationToken,
    ) -> QuizsmithResult<InteractionTotals> {
        let interactions = self.interactions.lock().unwrap();
        let rows: Vec<_> = interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .collect();
        Ok(InteractionTotals {
            total_interactions: rows.len() as i64,
            total_tokens: rows.iter().map(|i| i64::from(i.tokens_used)).sum(),
            total_duration_ms: rows.iter().map(|i| i64::from(i.duration_ms)).sum(),
            error_count: rows
                .iter()
                .filter(|i| i.status == GenerationStatus::Failed)
                .count() as i64,
        })
    }
}

/// Scripted [`ProviderClient`] that counts its calls.
pub struct MockProvider {
    provider: Provider,
    response: Mutex<Result<GenerationOutput, ProviderError>>,
    calls: AtomicU32,
}

impl MockProvider {
    pub fn succeeding(provider: Provider, output: GenerationOutput) -> Self {
        Self {
            provider,
            response: Mutex::new(Ok(output)),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(provider: Provider, error: ProviderError) -> Self {
        Self {
            provider,
            response: Mutex::new(Err(error)),
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate_content(
        &self,
        _model: &Model,
        _template: &PromptTemplate,
        _params: &HashMap<String, String>,
        _cancel: &CancellationToken,
    ) -> Result<GenerationOutput, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().unwrap().clone()
    }
}

pub fn test_model(id: i32, provider: Provider, model_name: &str) -> Model {
    Model {
        id,
        provider,
        model_name: model_name.to_string(),
        settings: HashMap::from([("temperature".to_string(), "0.3".to_string())]),
        created_at: Utc::now().naive_utc(),
        updated_at: Utc::now().naive_utc(),
    }
}

pub fn test_template(id: i32) -> PromptTemplate {
    PromptTemplate {
        id,
        name: "quiz_questions".to_string(),
        category: "multiple_choice".to_string(),
        template_text: "Write {{count}} questions about {{topic}}.".to_string(),
        parameters: vec!["count".to_string(), "topic".to_string()],
        created_at: Utc::now().naive_utc(),
        updated_at: Utc::now().naive_utc(),
    }
}

pub fn test_params() -> HashMap<String, String> {
    HashMap::from([
        ("count".to_string(), "5".to_string()),
        ("topic".to_string(), "biology".to_string()),
    ])
}

pub fn test_output(input_tokens: i64, output_tokens: i64) -> GenerationOutput {
    GenerationOutput {
        content: "Q1: What is a cell?".to_string(),
        input_tokens,
        output_tokens,
        estimated_cost_usd: 0.001,
    }
}
