//! End-to-end generation orchestration.

use quizsmith_core::{
    Feedback, Generation, GenerationStatus, NewFeedback, NewGeneration, NewInteraction, Provider,
    UserStats,
};
use quizsmith_error::{
    ConfigError, QuizsmithError, QuizsmithResult, ValidationError, ValidationErrorKind,
};
use quizsmith_interface::{ContentStore, ProviderClient};
use quizsmith_providers::{error_label, GenerationMetrics};
use quizsmith_rate_limit::RateLimiter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

const INTERACTION_TYPE_GENERATION: &str = "content_generation";
const SUMMARY_MAX_CHARS: usize = 200;

/// Inputs for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateContentRequest {
    /// The requesting user.
    pub user_id: i64,
    /// The registered model to generate with.
    pub model_id: i32,
    /// The prompt template to render.
    pub prompt_template_id: i32,
    /// Parameters for template rendering.
    pub params: HashMap<String, String>,
}

/// Composes the rate limiter, content store, and provider clients into the
/// generation operations the handler layer exposes.
///
/// Per request the orchestrator runs a small state machine with terminal
/// states completed/failed: admission checks first (no side effects), then
/// a pending generation row *before* the upstream call — if the process
/// dies mid-call an operator can find and reconcile orphaned pending rows
/// instead of losing the record — then the at-most-once provider call, and
/// finalization plus an interaction audit row. The upstream call is never
/// retried here; a duplicate billable generation is worse than a surfaced
/// error.
pub struct GenerationOrchestrator<S: ContentStore> {
    store: Arc<S>,
    rate_limiter: Arc<RateLimiter>,
    providers: HashMap<Provider, Arc<dyn ProviderClient>>,
}

impl<S: ContentStore> GenerationOrchestrator<S> {
    /// Create an orchestrator from its collaborators.
    pub fn new(
        store: Arc<S>,
        rate_limiter: Arc<RateLimiter>,
        providers: HashMap<Provider, Arc<dyn ProviderClient>>,
    ) -> Self {
        Self {
            store,
            rate_limiter,
            providers,
        }
    }

    /// Generate content for a user from a registered model and template.
    ///
    /// # Errors
    ///
    /// - Validation: unknown model or template id.
    /// - RateLimit: user RPM, provider RPM, or (after a successful call)
    ///   the daily token quota; in the quota case the generation is still
    ///   persisted completed with its real token count, since the upstream
    ///   cost cannot be un-incurred.
    /// - Provider: upstream failure; the generation is finalized failed.
    /// - Database: persistence failure, after internal retries.
    #[instrument(
        skip(self, request, cancel),
        fields(user_id = request.user_id, model_id = request.model_id)
    )]
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        // Admission first: no side effects exist yet, so a rejected caller
        // costs nothing.
        self.rate_limiter.allow_request(request.user_id)?;

        let model = self
            .store
            .get_model(request.model_id, cancel)
            .await
            .map_err(|e| not_found_to_validation(e, "model", request.model_id.to_string()))?;
        let template = self
            .store
            .get_prompt_template(request.prompt_template_id, cancel)
            .await
            .map_err(|e| {
                not_found_to_validation(
                    e,
                    "prompt template",
                    request.prompt_template_id.to_string(),
                )
            })?;

        self.rate_limiter.allow_provider_request(model.provider)?;
        let client = self.providers.get(&model.provider).ok_or_else(|| {
            ConfigError::new(format!(
                "no client configured for provider {}",
                model.provider
            ))
        })?;

        // Durability point: the pending row exists before the upstream
        // call is issued.
        let generation = self
            .store
            .create_generation(
                NewGeneration {
                    user_id: request.user_id,
                    prompt_template_id: template.id,
                    input_params: request.params.clone(),
                    model_name: model.model_name.clone(),
                },
                cancel,
            )
            .await?;

        let started = Instant::now();
        let result = client
            .generate_content(&model, &template, &request.params, cancel)
            .await;
        let duration = started.elapsed();
        let duration_ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let metrics = GenerationMetrics::get();

        match result {
            Err(e) => {
                error!(
                    error = %e,
                    generation_id = %generation.id,
                    "Upstream generation failed"
                );
                metrics.record_error(model.provider.as_str(), &model.model_name, error_label(&e));

                // Failure-path persistence is best-effort: the provider
                // error is what the caller must see, never a masked one.
                if let Err(persist) = self.store.fail_generation(generation.id, cancel).await {
                    error!(
                        error = %persist,
                        generation_id = %generation.id,
                        "Failed to finalize generation as failed"
                    );
                }
                let audit = NewInteraction {
                    user_id: request.user_id,
                    model_name: model.model_name.clone(),
                    interaction_type: INTERACTION_TYPE_GENERATION.to_string(),
                    input_summary: summarize_params(&request.params),
                    output_summary: None,
                    tokens_used: 0,
                    duration_ms,
                    status: GenerationStatus::Failed,
                    error_message: Some(e.to_string()),
                };
                if let Err(persist) = self.store.record_interaction(audit, cancel).await {
                    error!(
                        error = %persist,
                        generation_id = %generation.id,
                        "Failed to record failed interaction"
                    );
                }

                Err(e.into())
            }
            Ok(output) => {
                let total_tokens = output.total_tokens();
                debug!(
                    generation_id = %generation.id,
                    total_tokens,
                    estimated_cost_usd = output.estimated_cost_usd,
                    "Upstream generation succeeded"
                );

                // Atomic check and debit. The content already exists and
                // cannot be un-generated, so a quota rejection here is
                // reported to the caller while the generation itself is
                // still finalized with its real token count.
                let quota = self
                    .rate_limiter
                    .charge_tokens(request.user_id, total_tokens);

                let completed = self
                    .store
                    .complete_generation(generation.id, &output, duration_ms, cancel)
                    .await?;
                self.store
                    .record_interaction(
                        NewInteraction {
                            user_id: request.user_id,
                            model_name: model.model_name.clone(),
                            interaction_type: INTERACTION_TYPE_GENERATION.to_string(),
                            input_summary: summarize_params(&request.params),
                            output_summary: Some(summarize(&output.content)),
                            tokens_used: total_tokens.clamp(0, i32::MAX as i64) as i32,
                            duration_ms,
                            status: GenerationStatus::Completed,
                            error_message: None,
                        },
                        cancel,
                    )
                    .await?;
                metrics.record_success(
                    model.provider.as_str(),
                    &model.model_name,
                    duration.as_secs_f64(),
                    total_tokens,
                );

                match quota {
                    Err(e) => {
                        warn!(
                            user_id = request.user_id,
                            generation_id = %completed.id,
                            "Generation completed but daily token quota is exhausted"
                        );
                        Err(e.into())
                    }
                    Ok(()) => Ok(completed),
                }
            }
        }
    }

    /// Attach a 1-5 rating (and optional comment) to a generation.
    ///
    /// # Errors
    ///
    /// - Validation: rating out of range, or unknown generation id.
    /// - Database: persistence failure, after internal retries.
    #[instrument(skip(self, comment, cancel))]
    pub async fn save_feedback(
        &self,
        user_id: i64,
        generation_id: Uuid,
        rating: i32,
        comment: Option<String>,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Feedback> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange(format!(
                "rating must be between 1 and 5, got {rating}"
            )))
            .into());
        }

        // The generation is loaded only to attribute the rating to its
        // model in metrics.
        let generation = self
            .store
            .get_generation(generation_id, cancel)
            .await
            .map_err(|e| not_found_to_validation(e, "generation", generation_id.to_string()))?;
        GenerationMetrics::get().record_feedback(&generation.model_name, rating);

        self.store
            .save_feedback(
                NewFeedback {
                    generation_id,
                    user_id,
                    rating,
                    comment,
                },
                cancel,
            )
            .await
    }

    /// Read-only usage report: persistence aggregates plus quota state.
    #[instrument(skip(self, cancel))]
    pub async fn get_user_stats(
        &self,
        user_id: i64,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<UserStats> {
        let totals = self.store.user_interaction_stats(user_id, cancel).await?;
        let average_duration_ms = if totals.total_interactions > 0 {
            totals.total_duration_ms as f64 / totals.total_interactions as f64
        } else {
            0.0
        };

        Ok(UserStats {
            total_interactions: totals.total_interactions,
            total_tokens: totals.total_tokens,
            average_duration_ms,
            error_count: totals.error_count,
            remaining_daily_tokens: self.rate_limiter.remaining_tokens(user_id),
            daily_token_limit: self.rate_limiter.daily_token_limit(),
        })
    }
}

fn not_found_to_validation(
    err: QuizsmithError,
    entity: &'static str,
    id: String,
) -> QuizsmithError {
    if err.is_not_found() {
        ValidationError::new(ValidationErrorKind::NotFound { entity, id }).into()
    } else {
        err
    }
}

fn summarize(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{truncated}…")
    }
}

fn summarize_params(params: &HashMap<String, String>) -> String {
    let mut entries: Vec<_> = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    entries.sort();
    summarize(&entries.join(", "))
}
