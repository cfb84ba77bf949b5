//! Error types for the Quizsmith generation core.
//!
//! This crate provides the foundation error types used throughout the
//! Quizsmith workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use quizsmith_error::{QuizsmithResult, ValidationError, ValidationErrorKind};
//!
//! fn check_rating(rating: i32) -> QuizsmithResult<()> {
//!     if !(1..=5).contains(&rating) {
//!         Err(ValidationError::new(ValidationErrorKind::OutOfRange(
//!             format!("rating must be 1..=5, got {rating}"),
//!         )))?;
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_rating(6).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod provider;
mod rate_limit;
mod retryable;
mod validation;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{QuizsmithError, QuizsmithErrorKind, QuizsmithResult};
pub use provider::{ProviderError, ProviderErrorKind};
pub use rate_limit::{LimitScope, RateLimitError, RateLimitErrorKind};
pub use retryable::RetryableError;
pub use validation::{ValidationError, ValidationErrorKind};
