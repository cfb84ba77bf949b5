//! AI content-generation orchestration core for the Quizsmith quiz platform.
//!
//! This facade crate composes the admission-control rate limiter, the
//! PostgreSQL content store, and the upstream provider clients into the
//! three operations the HTTP handler layer exposes: generate content, save
//! feedback, and report per-user usage statistics.
//!
//! # Example
//!
//! ```no_run
//! use quizsmith::{
//!     provider_clients_from_env, GenerateContentRequest, GenerationOrchestrator,
//!     QuizsmithConfig, RateLimiter, SystemClock,
//! };
//! use quizsmith_database::{pool_from_env, PgContentStore};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! quizsmith::telemetry::init_console_telemetry().ok();
//!
//! let config = QuizsmithConfig::load()?;
//! let store = Arc::new(PgContentStore::new(pool_from_env()?, config.retry));
//! let rate_limiter = Arc::new(RateLimiter::new(
//!     config.limits.clone(),
//!     Arc::new(SystemClock),
//! )?);
//! let providers = provider_clients_from_env(&config.providers)?;
//! let orchestrator = GenerationOrchestrator::new(store, rate_limiter, providers);
//!
//! let generation = orchestrator
//!     .generate_content(
//!         GenerateContentRequest {
//!             user_id: 42,
//!             model_id: 1,
//!             prompt_template_id: 1,
//!             params: HashMap::from([("topic".to_string(), "biology".to_string())]),
//!         },
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{}", generation.generated_content);
//! # Ok(())
//! # }
//! ```

mod config;
mod orchestrator;
mod registry;
pub mod telemetry;

pub use config::{ProviderSettings, QuizsmithConfig};
pub use orchestrator::{GenerateContentRequest, GenerationOrchestrator};
pub use registry::provider_clients_from_env;

// Re-export the pieces callers wire together.
pub use quizsmith_core::{
    Clock, Feedback, Generation, GenerationOutput, GenerationStatus, Interaction, Model,
    PromptTemplate, Provider, SystemClock, UserStats,
};
pub use quizsmith_error::{
    LimitScope, QuizsmithError, QuizsmithErrorKind, QuizsmithResult, RetryableError,
};
pub use quizsmith_database::{PgContentStore, RetryPolicy};
pub use quizsmith_interface::{ContentStore, ProviderClient};
pub use quizsmith_providers::{AnthropicClient, HttpClientConfig, OpenAiClient};
pub use quizsmith_rate_limit::{LimitSettings, RateLimiter};
