//! Repository for the interaction audit log.

use crate::rows::{InteractionRow, NewInteractionRow};
use crate::DatabaseResult;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use quizsmith_core::{GenerationStatus, InteractionTotals};
use quizsmith_error::DatabaseError;

/// Repository trait for the append-only interaction log.
pub trait InteractionRepository {
    /// Append an interaction row.
    fn create(&mut self, new: NewInteractionRow) -> DatabaseResult<InteractionRow>;

    /// Aggregate per-user totals across all interactions.
    fn totals_for_user(&mut self, user_id: i64) -> DatabaseResult<InteractionTotals>;

    /// List a user's interactions, newest first.
    fn list_for_user(&mut self, user_id: i64, limit: i64) -> DatabaseResult<Vec<InteractionRow>>;
}

/// PostgreSQL implementation of [`InteractionRepository`].
pub struct PostgresInteractionRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresInteractionRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl<'a> InteractionRepository for PostgresInteractionRepository<'a> {
    fn create(&mut self, new: NewInteractionRow) -> DatabaseResult<InteractionRow> {
        use crate::schema::interactions;

        diesel::insert_into(interactions::table)
            .values(&new)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn totals_for_user(&mut self, user_id: i64) -> DatabaseResult<InteractionTotals> {
        use crate::schema::interactions::dsl;

        // Averages are computed by the caller from count and sum; Postgres
        // AVG over integers yields NUMERIC, which this crate does not map.
        let (total_interactions, total_tokens, total_duration_ms): (i64, Option<i64>, Option<i64>) =
            dsl::interactions
                .filter(dsl::user_id.eq(user_id))
                .select((
                    count_star(),
                    sum(dsl::tokens_used),
                    sum(dsl::duration_ms),
                ))
                .first(self.conn)
                .map_err(DatabaseError::from)?;

        let error_count: i64 = dsl::interactions
            .filter(dsl::user_id.eq(user_id))
            .filter(dsl::status.eq(GenerationStatus::Failed.as_str()))
            .count()
            .get_result(self.conn)
            .map_err(DatabaseError::from)?;

        Ok(InteractionTotals {
            total_interactions,
            total_tokens: total_tokens.unwrap_or(0),
            total_duration_ms: total_duration_ms.unwrap_or(0),
            error_count,
        })
    }

    fn list_for_user(&mut self, user_id: i64, limit: i64) -> DatabaseResult<Vec<InteractionRow>> {
        use crate::schema::interactions::dsl;

        dsl::interactions
            .filter(dsl::user_id.eq(user_id))
            .order(dsl::created_at.desc())
            .limit(limit)
            .load(self.conn)
            .map_err(DatabaseError::from)
    }
}
