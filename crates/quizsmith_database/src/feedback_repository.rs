//! Repository for generation feedback.

use crate::rows::{FeedbackRow, NewFeedbackRow};
use crate::DatabaseResult;
use diesel::prelude::*;
use quizsmith_error::DatabaseError;
use uuid::Uuid;

/// Repository trait for feedback operations.
pub trait FeedbackRepository {
    /// Insert a feedback row.
    ///
    /// # Errors
    ///
    /// Surfaces `Constraint` when the referenced generation does not exist.
    fn create(&mut self, new: NewFeedbackRow) -> DatabaseResult<FeedbackRow>;

    /// List feedback for a generation, newest first.
    fn list_for_generation(&mut self, generation_id: Uuid) -> DatabaseResult<Vec<FeedbackRow>>;
}

/// PostgreSQL implementation of [`FeedbackRepository`].
pub struct PostgresFeedbackRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresFeedbackRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl<'a> FeedbackRepository for PostgresFeedbackRepository<'a> {
    fn create(&mut self, new: NewFeedbackRow) -> DatabaseResult<FeedbackRow> {
        use crate::schema::feedbacks;

        diesel::insert_into(feedbacks::table)
            .values(&new)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn list_for_generation(&mut self, generation_id: Uuid) -> DatabaseResult<Vec<FeedbackRow>> {
        use crate::schema::feedbacks::dsl;

        dsl::feedbacks
            .filter(dsl::generation_id.eq(generation_id))
            .order(dsl::created_at.desc())
            .load(self.conn)
            .map_err(DatabaseError::from)
    }
}
