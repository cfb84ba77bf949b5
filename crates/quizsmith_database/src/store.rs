//! PostgreSQL-backed content store.

use crate::connection::PgPool;
use crate::conversions::json_from_string_map;
use crate::retry::{with_retry, RetryError, RetryPolicy};
use crate::rows::{NewFeedbackRow, NewGenerationRow, NewInteractionRow};
use crate::{
    FeedbackRepository, GenerationRepository, InteractionRepository, ModelRepository,
    PostgresFeedbackRepository, PostgresGenerationRepository, PostgresInteractionRepository,
    PostgresModelRepository, PostgresPromptTemplateRepository, PromptTemplateRepository,
};
use async_trait::async_trait;
use diesel::prelude::*;
use quizsmith_core::{
    Feedback, Generation, GenerationOutput, GenerationStatus, InteractionTotals, Model,
    NewFeedback, NewGeneration, NewInteraction, PromptTemplate,
};
use quizsmith_error::{DatabaseError, DatabaseErrorKind, QuizsmithResult};
use quizsmith_interface::ContentStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use uuid::Uuid;

/// [`ContentStore`] implementation over a PostgreSQL connection pool.
///
/// Every call runs the blocking diesel work on the tokio blocking pool and
/// is retried per the configured [`RetryPolicy`] when it fails with a
/// transient infrastructure error.
pub struct PgContentStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgContentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Create a store from the `DATABASE_URL` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or the pool cannot be
    /// initialized.
    pub fn from_env(retry: RetryPolicy) -> Result<Self, DatabaseError> {
        Ok(Self::new(crate::connection::pool_from_env()?, retry))
    }

    /// Run a blocking repository operation with retry on transient errors.
    async fn run<T, F>(&self, cancel: &CancellationToken, op: F) -> Result<T, DatabaseError>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> Result<T, DatabaseError> + Clone + Send + 'static,
    {
        let pool = self.pool.clone();
        with_retry(
            cancel,
            move || {
                let pool = pool.clone();
                let op = op.clone();
                async move {
                    tokio::task::spawn_blocking(move || {
                        let mut conn = pool.get().map_err(|e| {
                            DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
                        })?;
                        op(&mut conn)
                    })
                    .await
                    .map_err(|e| {
                        DatabaseError::new(DatabaseErrorKind::Query(format!(
                            "blocking task join failed: {e}"
                        )))
                    })?
                }
            },
            self.retry.max_attempts,
            self.retry.base_delay(),
        )
        .await
        .map_err(flatten_retry)
    }
}

fn flatten_retry(err: RetryError<DatabaseError>) -> DatabaseError {
    match err {
        RetryError::Cancelled => DatabaseError::new(DatabaseErrorKind::Cancelled),
        RetryError::Attempt(e) => e,
        RetryError::Exhausted { attempts, source } => {
            DatabaseError::new(DatabaseErrorKind::RetriesExhausted {
                attempts,
                last: source.to_string(),
            })
        }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    #[instrument(skip(self, cancel))]
    async fn get_model(&self, id: i32, cancel: &CancellationToken) -> QuizsmithResult<Model> {
        let row = self
            .run(cancel, move |conn| {
                PostgresModelRepository::new(conn)
                    .get(id)?
                    .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))
            })
            .await?;
        Ok(Model::try_from(row)?)
    }

    #[instrument(skip(self, cancel))]
    async fn get_prompt_template(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<PromptTemplate> {
        let row = self
            .run(cancel, move |conn| {
                PostgresPromptTemplateRepository::new(conn)
                    .get(id)?
                    .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))
            })
            .await?;
        Ok(PromptTemplate::from(row))
    }

    #[instrument(skip(self, new, cancel), fields(user_id = new.user_id))]
    async fn create_generation(
        &self,
        new: NewGeneration,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        // The id is minted before the retry loop so a retried insert after
        // an ambiguous failure conflicts instead of creating a second row.
        let row = NewGenerationRow {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            prompt_template_id: new.prompt_template_id,
            input_params: json_from_string_map(&new.input_params),
            status: GenerationStatus::Pending.as_str().to_string(),
            model_name: new.model_name,
        };
        debug!(generation_id = %row.id, "Persisting pending generation");

        let inserted = self
            .run(cancel, move |conn| {
                PostgresGenerationRepository::new(conn).create(row.clone())
            })
            .await?;
        Ok(Generation::try_from(inserted)?)
    }

    #[instrument(skip(self, output, cancel), fields(generation_id = %id))]
    async fn complete_generation(
        &self,
        id: Uuid,
        output: &GenerationOutput,
        duration_ms: i32,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        let content = output.content.clone();
        let tokens_used = output.total_tokens().clamp(0, i32::MAX as i64) as i32;

        let row = self
            .run(cancel, move |conn| {
                PostgresGenerationRepository::new(conn).complete(
                    id,
                    &content,
                    tokens_used,
                    duration_ms,
                )
            })
            .await?;
        Ok(Generation::try_from(row)?)
    }

    #[instrument(skip(self, cancel), fields(generation_id = %id))]
    async fn fail_generation(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        let row = self
            .run(cancel, move |conn| {
                PostgresGenerationRepository::new(conn).fail(id)
            })
            .await?;
        Ok(Generation::try_from(row)?)
    }

    #[instrument(skip(self, cancel), fields(generation_id = %id))]
    async fn get_generation(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Generation> {
        let row = self
            .run(cancel, move |conn| {
                PostgresGenerationRepository::new(conn)
                    .get(id)?
                    .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))
            })
            .await?;
        Ok(Generation::try_from(row)?)
    }

    #[instrument(skip(self, new, cancel), fields(generation_id = %new.generation_id))]
    async fn save_feedback(
        &self,
        new: NewFeedback,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<Feedback> {
        let row = NewFeedbackRow::from(new);

        // One transaction: the generation existence check and the feedback
        // insert commit or roll back together. diesel's transaction
        // combinator rolls back on every Err return path.
        let inserted = self
            .run(cancel, move |conn| {
                let row = row.clone();
                conn.transaction::<_, DatabaseError, _>(|conn| {
                    PostgresGenerationRepository::new(conn)
                        .get(row.generation_id)?
                        .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
                    PostgresFeedbackRepository::new(conn).create(row)
                })
            })
            .await?;
        Ok(Feedback::from(inserted))
    }

    #[instrument(skip(self, new, cancel), fields(user_id = new.user_id))]
    async fn record_interaction(
        &self,
        new: NewInteraction,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<()> {
        let row = NewInteractionRow::from(new);
        self.run(cancel, move |conn| {
            PostgresInteractionRepository::new(conn).create(row.clone())
        })
        .await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    async fn user_interaction_stats(
        &self,
        user_id: i64,
        cancel: &CancellationToken,
    ) -> QuizsmithResult<InteractionTotals> {
        let totals = self
            .run(cancel, move |conn| {
                PostgresInteractionRepository::new(conn).totals_for_user(user_id)
            })
            .await?;
        Ok(totals)
    }
}
