//! Repository for registered upstream models.

use crate::rows::{ModelRow, NewModelRow, UpdateModelRow};
use crate::DatabaseResult;
use diesel::prelude::*;
use quizsmith_error::DatabaseError;

/// Repository trait for model registry operations.
pub trait ModelRepository {
    /// Register a new model.
    fn create(&mut self, new: NewModelRow) -> DatabaseResult<ModelRow>;

    /// Fetch a model by id.
    fn get(&mut self, id: i32) -> DatabaseResult<Option<ModelRow>>;

    /// List all registered models.
    fn list(&mut self) -> DatabaseResult<Vec<ModelRow>>;

    /// Apply an update to a model.
    ///
    /// # Errors
    ///
    /// Surfaces `NotFound` when no model with the id exists.
    fn update(&mut self, id: i32, update: UpdateModelRow) -> DatabaseResult<ModelRow>;

    /// Remove a model.
    fn delete(&mut self, id: i32) -> DatabaseResult<()>;
}

/// PostgreSQL implementation of [`ModelRepository`].
pub struct PostgresModelRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresModelRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl<'a> ModelRepository for PostgresModelRepository<'a> {
    fn create(&mut self, new: NewModelRow) -> DatabaseResult<ModelRow> {
        use crate::schema::models;

        diesel::insert_into(models::table)
            .values(&new)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn get(&mut self, id: i32) -> DatabaseResult<Option<ModelRow>> {
        use crate::schema::models::dsl;

        dsl::models
            .find(id)
            .first(self.conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn list(&mut self) -> DatabaseResult<Vec<ModelRow>> {
        use crate::schema::models::dsl;

        dsl::models
            .order(dsl::id.asc())
            .load(self.conn)
            .map_err(DatabaseError::from)
    }

    fn update(&mut self, id: i32, update: UpdateModelRow) -> DatabaseResult<ModelRow> {
        use crate::schema::models::dsl;

        diesel::update(dsl::models.find(id))
            .set(&update)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn delete(&mut self, id: i32) -> DatabaseResult<()> {
        use crate::schema::models::dsl;

        diesel::delete(dsl::models.find(id))
            .execute(self.conn)
            .map(|_| ())
            .map_err(DatabaseError::from)
    }
}
