//! Anthropic messages API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A request content block.
///
/// Only text blocks are used by the generation core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnthropicContentBlock {
    /// Plain text content.
    Text {
        /// The text body.
        text: String,
    },
}

/// One message in a messages API request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct AnthropicMessage {
    /// Message role ("user" or "assistant").
    role: String,
    /// Content blocks.
    content: Vec<AnthropicContentBlock>,
}

impl AnthropicMessage {
    /// Creates a new builder for `AnthropicMessage`.
    pub fn builder() -> AnthropicMessageBuilder {
        AnthropicMessageBuilder::default()
    }
}

/// Messages API request body.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct AnthropicRequest {
    /// Model identifier.
    model: String,
    /// Maximum tokens to generate.
    max_tokens: u32,
    /// Conversation messages.
    messages: Vec<AnthropicMessage>,
    /// Sampling temperature.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl AnthropicRequest {
    /// Creates a new builder for `AnthropicRequest`.
    pub fn builder() -> AnthropicRequestBuilder {
        AnthropicRequestBuilder::default()
    }
}

/// A response content block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct AnthropicResponseContent {
    /// Block type (always "text" for the calls this core makes).
    #[serde(rename = "type")]
    kind: String,
    /// The text body.
    #[builder(default)]
    #[serde(default)]
    text: String,
}

/// Token usage statistics reported by Anthropic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct AnthropicUsage {
    /// Prompt-side tokens consumed.
    #[serde(default)]
    input_tokens: i64,
    /// Completion-side tokens generated.
    #[serde(default)]
    output_tokens: i64,
}

/// Messages API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct AnthropicResponse {
    /// Response identifier.
    #[builder(default)]
    #[serde(default)]
    id: String,
    /// Generated content blocks.
    content: Vec<AnthropicResponseContent>,
    /// Token usage for the call.
    #[builder(default)]
    #[serde(default)]
    usage: AnthropicUsage,
    /// Why generation stopped, when reported.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_reason: Option<String>,
}

impl AnthropicResponse {
    /// Creates a new builder for `AnthropicResponse`.
    pub fn builder() -> AnthropicResponseBuilder {
        AnthropicResponseBuilder::default()
    }
}
