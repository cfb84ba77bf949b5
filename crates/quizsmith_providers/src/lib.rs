//! Upstream provider clients for the Quizsmith generation core.
//!
//! One [`quizsmith_interface::ProviderClient`] implementation per upstream
//! provider, each following the same shape: render the prompt template,
//! build the provider-specific request body, issue the HTTP call with the
//! configured timeout, classify 429 responses distinctly from other API
//! failures, and extract content plus token usage from the response.
//!
//! # Example
//!
//! ```no_run
//! use quizsmith_providers::{HttpClientConfig, OpenAiClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::from_env(&HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

mod anthropic;
mod config;
mod metrics;
mod openai;
pub mod rates;

pub use anthropic::{
    AnthropicClient, AnthropicContentBlock, AnthropicMessage, AnthropicMessageBuilder,
    AnthropicRequest, AnthropicRequestBuilder, AnthropicResponse, AnthropicResponseBuilder,
    AnthropicResponseContent, AnthropicUsage,
};
pub use config::HttpClientConfig;
pub use metrics::{error_label, GenerationMetrics};
pub use openai::{
    OpenAiChoice, OpenAiChoiceMessage, OpenAiClient, OpenAiMessage, OpenAiMessageBuilder,
    OpenAiRequest, OpenAiRequestBuilder, OpenAiResponse, OpenAiResponseBuilder, OpenAiRole,
    OpenAiUsage,
};
