//! PostgreSQL integration for the Quizsmith generation core.
//!
//! This crate provides the diesel schema, row models, entity repositories,
//! the bounded-retry executor, and the [`PgContentStore`] implementation of
//! [`quizsmith_interface::ContentStore`] the orchestrator runs against.
//!
//! # Example
//!
//! ```rust,ignore
//! use quizsmith_database::{pool_from_env, run_migrations, PgContentStore, RetryPolicy};
//!
//! let pool = pool_from_env()?;
//! run_migrations(&mut pool.get()?)?;
//! let store = PgContentStore::new(pool, RetryPolicy::default());
//! ```

mod connection;
mod conversions;
mod feedback_repository;
mod generation_repository;
mod interaction_repository;
mod model_repository;
mod prompt_repository;
mod retry;
mod rows;
mod store;

// Public module for external schema access
pub mod schema;

// Re-export connection utilities
pub use connection::{
    create_pool, establish_connection, pool_from_env, run_migrations, PgPool, MIGRATIONS,
};

// Re-export repositories
pub use feedback_repository::{FeedbackRepository, PostgresFeedbackRepository};
pub use generation_repository::{GenerationRepository, PostgresGenerationRepository};
pub use interaction_repository::{InteractionRepository, PostgresInteractionRepository};
pub use model_repository::{ModelRepository, PostgresModelRepository};
pub use prompt_repository::{PostgresPromptTemplateRepository, PromptTemplateRepository};

// Re-export retry executor
pub use retry::{with_retry, RetryError, RetryPolicy};

// Re-export row types
pub use rows::{
    FeedbackRow, GenerationRow, InteractionRow, ModelRow, NewFeedbackRow, NewGenerationRow,
    NewInteractionRow, NewModelRow, NewPromptTemplateRow, PromptTemplateRow, UpdateGenerationRow,
    UpdateModelRow, UpdatePromptTemplateRow,
};

// Re-export the store
pub use store::PgContentStore;

use quizsmith_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
