//! Repository for prompt templates.

use crate::rows::{NewPromptTemplateRow, PromptTemplateRow, UpdatePromptTemplateRow};
use crate::DatabaseResult;
use diesel::prelude::*;
use quizsmith_error::DatabaseError;

/// Repository trait for prompt template operations.
pub trait PromptTemplateRepository {
    /// Store a new template.
    fn create(&mut self, new: NewPromptTemplateRow) -> DatabaseResult<PromptTemplateRow>;

    /// Fetch a template by id.
    fn get(&mut self, id: i32) -> DatabaseResult<Option<PromptTemplateRow>>;

    /// List templates, optionally filtered by category.
    fn list(&mut self, category: Option<String>) -> DatabaseResult<Vec<PromptTemplateRow>>;

    /// Apply an update to a template.
    fn update(
        &mut self,
        id: i32,
        update: UpdatePromptTemplateRow,
    ) -> DatabaseResult<PromptTemplateRow>;

    /// Remove a template.
    fn delete(&mut self, id: i32) -> DatabaseResult<()>;
}

/// PostgreSQL implementation of [`PromptTemplateRepository`].
pub struct PostgresPromptTemplateRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresPromptTemplateRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl<'a> PromptTemplateRepository for PostgresPromptTemplateRepository<'a> {
    fn create(&mut self, new: NewPromptTemplateRow) -> DatabaseResult<PromptTemplateRow> {
        use crate::schema::prompt_templates;

        diesel::insert_into(prompt_templates::table)
            .values(&new)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn get(&mut self, id: i32) -> DatabaseResult<Option<PromptTemplateRow>> {
        use crate::schema::prompt_templates::dsl;

        dsl::prompt_templates
            .find(id)
            .first(self.conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn list(&mut self, category: Option<String>) -> DatabaseResult<Vec<PromptTemplateRow>> {
        use crate::schema::prompt_templates::dsl;

        let mut query = dsl::prompt_templates.into_boxed();
        if let Some(category) = category {
            query = query.filter(dsl::category.eq(category));
        }

        query
            .order(dsl::name.asc())
            .load(self.conn)
            .map_err(DatabaseError::from)
    }

    fn update(
        &mut self,
        id: i32,
        update: UpdatePromptTemplateRow,
    ) -> DatabaseResult<PromptTemplateRow> {
        use crate::schema::prompt_templates::dsl;

        diesel::update(dsl::prompt_templates.find(id))
            .set(&update)
            .get_result(self.conn)
            .map_err(DatabaseError::from)
    }

    fn delete(&mut self, id: i32) -> DatabaseResult<()> {
        use crate::schema::prompt_templates::dsl;

        diesel::delete(dsl::prompt_templates.find(id))
            .execute(self.conn)
            .map(|_| ())
            .map_err(DatabaseError::from)
    }
}
