//! Core data types for the Quizsmith generation core.
//!
//! This crate defines the domain model shared by the rate limiter, provider
//! clients, persistence layer, and orchestrator: models, prompt templates,
//! generations, feedback, interaction audit rows, usage statistics, the
//! injectable clock, and the restricted prompt-template renderer.

mod clock;
mod feedback;
mod generation;
mod interaction;
mod model;
mod prompt;
mod provider;
mod stats;
pub mod template;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feedback::{Feedback, NewFeedback};
pub use generation::{Generation, GenerationOutput, GenerationStatus, NewGeneration};
pub use interaction::{Interaction, NewInteraction};
pub use model::Model;
pub use prompt::PromptTemplate;
pub use provider::Provider;
pub use stats::{InteractionTotals, UserStats};
