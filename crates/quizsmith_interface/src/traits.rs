//! Seam traits between the orchestrator and its collaborators.

use async_trait::async_trait;
use quizsmith_core::{
    Feedback, Generation, GenerationOutput, InteractionTotals, Model, NewFeedback, NewGeneration,
    NewInteraction, PromptTemplate, Provider,
};
use quizsmith_error::{ProviderError, QuizsmithResult};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Uniform contract over heterogeneous upstream text-generation providers.
///
/// Implementations differ only in request/response shape and
/// authentication; the orchestrator is provider-agnostic and dispatches by
/// the model's [`Provider`] tag.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this client talks to.
    fn provider(&self) -> Provider;

    /// Render the template, call the provider, and extract content plus
    /// token usage.
    ///
    /// The call is bounded by the client's configured timeout and is
    /// cancelled cooperatively through `cancel`. A 429-equivalent response
    /// surfaces as a rate-limit error, distinct from other API failures.
    async fn generate_content(
        &self,
        model: &Model,
        template: &PromptTemplate,
        params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutput, ProviderError>;
}

/// Persistence operations the orchestrator needs, in domain terms.
///
/// Implementations must surface a distinguishable not-found condition per
/// entity (`DatabaseErrorKind::NotFound`) and are responsible for their own
/// transient-error resilience; the orchestrator never retries store calls.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load a model by id.
    async fn get_model(&self, id: i32, cancel: &CancellationToken) -> QuizsmithResult<Model>;

    /// Load a prompt template by id.
    async fn get_prompt_template(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<PromptTemplate>;

    /// Insert a new generation in pending state and return it.
    async fn create_generation(
        &self,
        new: NewGeneration,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation>;

    /// Finalize a pending generation as completed with its output.
    async fn complete_generation(
        &self,
        id: Uuid,
        output: &GenerationOutput,
        duration_ms: i32,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation>;

    /// Finalize a pending generation as failed.
    async fn fail_generation(&self, id: Uuid, cancel: &CancellationToken)
        -> QuizsmithResult<Generation>;

    /// Load a generation by id.
    async fn get_generation(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation>;

    /// Persist feedback for a generation in a single transaction.
    async fn save_feedback(
        &self,
        new: NewFeedback,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Feedback>;

    /// Append an interaction audit row.
    async fn record_interaction(
        &self,
        new: NewInteraction,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<()>;

    /// Aggregate interaction totals for a user.
    async fn user_interaction_stats(
        &self,
        user_id: i64,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<InteractionTotals>;
}
