//! OpenAI chat completions data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// OpenAI message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAiRole {
    /// System instruction.
    System,
    /// End-user message.
    User,
    /// Model reply.
    Assistant,
}

/// One message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct OpenAiMessage {
    /// Message role.
    role: OpenAiRole,
    /// Message content.
    content: String,
}

impl OpenAiMessage {
    /// Creates a new builder for `OpenAiMessage`.
    pub fn builder() -> OpenAiMessageBuilder {
        OpenAiMessageBuilder::default()
    }
}

/// Chat completions request body.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct OpenAiRequest {
    /// Model identifier.
    model: String,
    /// Conversation messages.
    messages: Vec<OpenAiMessage>,
    /// Sampling temperature.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl OpenAiRequest {
    /// Creates a new builder for `OpenAiRequest`.
    pub fn builder() -> OpenAiRequestBuilder {
        OpenAiRequestBuilder::default()
    }
}

/// Token usage statistics reported by OpenAI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct OpenAiUsage {
    /// Prompt-side tokens consumed.
    #[serde(default)]
    prompt_tokens: i64,
    /// Completion-side tokens generated.
    #[serde(default)]
    completion_tokens: i64,
    /// Total tokens for the call.
    #[serde(default)]
    total_tokens: i64,
}

/// The message inside a response choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct OpenAiChoiceMessage {
    /// Role of the reply (always "assistant" for chat completions).
    role: String,
    /// Generated text.
    content: String,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct OpenAiChoice {
    /// The generated message.
    message: OpenAiChoiceMessage,
    /// Why generation stopped, when reported.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

/// Chat completions response body.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into))]
pub struct OpenAiResponse {
    /// Response identifier.
    #[builder(default)]
    #[serde(default)]
    id: String,
    /// Completion choices (one unless `n` was requested).
    choices: Vec<OpenAiChoice>,
    /// Token usage for the call.
    #[builder(default)]
    #[serde(default)]
    usage: OpenAiUsage,
}

impl OpenAiResponse {
    /// Creates a new builder for `OpenAiResponse`.
    pub fn builder() -> OpenAiResponseBuilder {
        OpenAiResponseBuilder::default()
    }
}
