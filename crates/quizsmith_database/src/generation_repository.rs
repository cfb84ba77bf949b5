//! Repository for generation lifecycle tracking.

use crate::rows::{GenerationRow, NewGenerationRow, UpdateGenerationRow};
use crate::DatabaseResult;
use diesel::prelude::*;
use quizsmith_core::GenerationStatus;
use quizsmith_error::{DatabaseError, DatabaseErrorKind};
use uuid::Uuid;

/// Repository trait for generation lifecycle operations.
///
/// A generation row transitions pending to completed or pending to failed,
/// exactly once; the finalizers enforce this by updating only rows still
/// in pending state.
pub trait GenerationRepository {
    /// Insert a new pending generation.
    fn create(&mut self, new: NewGenerationRow) -> DatabaseResult<GenerationRow>;

    /// Fetch a generation by id.
    fn get(&mut self, id: Uuid) -> DatabaseResult<Option<GenerationRow>>;

    /// Finalize a pending generation as completed with its output.
    ///
    /// # Errors
    ///
    /// Surfaces `Conflict` when the generation is not pending, so a
    /// finalized record can never be reopened or double-finalized.
    fn complete(
        &mut self,
        id: Uuid,
        content: &str,
        tokens_used: i32,
        duration_ms: i32,
    ) -> DatabaseResult<GenerationRow>;

    /// Finalize a pending generation as failed.
    ///
    /// # Errors
    ///
    /// Surfaces `Conflict` when the generation is not pending.
    fn fail(&mut self, id: Uuid) -> DatabaseResult<GenerationRow>;

    /// List a user's generations, newest first.
    fn list_for_user(&mut self, user_id: i64, limit: i64) -> DatabaseResult<Vec<GenerationRow>>;
}

/// PostgreSQL implementation of [`GenerationRepository`].
pub struct PostgresGenerationRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresGenerationRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    fn finalize(
        &mut self,
        id: Uuid,
        update: UpdateGenerationRow,
    ) -> DatabaseResult<GenerationRow> {
        use crate::schema::generations::dsl;

        diesel::update(
            dsl::generations
                .find(id)
                .filter(dsl::status.eq(GenerationStatus::Pending.as_str())),
        )
        .set(&update)
        .get_result(self.conn)
        .optional()
        .map_err(DatabaseError::from)?
        .ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Conflict(format!(
                "generation {id} is not pending"
            )))
        })
    }
}

impl<'a> GenerationRepository for PostgresGenerationRepository<'a> {
    fn create(&mut self, new: NewGenerationRow) -> DatabaseResult<GenerationRow> {
        use crate::schema::generations;

        diesel::insert_into(generations::table)
            .values(&new)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn get(&mut self, id: Uuid) -> DatabaseResult<Option<GenerationRow>> {
        use crate::schema::generations::dsl;

        dsl::generations
            .find(id)
            .first(self.conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn complete(
        &mut self,
        id: Uuid,
        content: &str,
        tokens_used: i32,
        duration_ms: i32,
    ) -> DatabaseResult<GenerationRow> {
        self.finalize(
            id,
            UpdateGenerationRow {
                generated_content: Some(content.to_string()),
                status: Some(GenerationStatus::Completed.as_str().to_string()),
                tokens_used: Some(tokens_used),
                duration_ms: Some(duration_ms),
            },
        )
    }

    fn fail(&mut self, id: Uuid) -> DatabaseResult<GenerationRow> {
        self.finalize(
            id,
            UpdateGenerationRow {
                status: Some(GenerationStatus::Failed.as_str().to_string()),
                ..Default::default()
            },
        )
    }

    fn list_for_user(&mut self, user_id: i64, limit: i64) -> DatabaseResult<Vec<GenerationRow>> {
        use crate::schema::generations::dsl;

        dsl::generations
            .filter(dsl::user_id.eq(user_id))
            .order(dsl::created_at.desc())
            .limit(limit)
            .load(self.conn)
            .map_err(DatabaseError::from)
    }
}
