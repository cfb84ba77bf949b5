//! OpenAI chat completions provider.

mod client;
mod dto;

pub use client::OpenAiClient;
pub use dto::{
    OpenAiChoice, OpenAiChoiceMessage, OpenAiMessage, OpenAiMessageBuilder, OpenAiRequest,
    OpenAiRequestBuilder, OpenAiResponse, OpenAiResponseBuilder, OpenAiRole, OpenAiUsage,
};
