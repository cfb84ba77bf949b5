//! Anthropic messages API client.

use crate::anthropic::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
};
use crate::{rates, HttpClientConfig};
use async_trait::async_trait;
use quizsmith_core::{template, GenerationOutput, Model, PromptTemplate, Provider};
use quizsmith_error::{ProviderError, ProviderErrorKind, ValidationErrorKind};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// Applied when a model row does not carry a max_tokens setting; the
// messages API requires the field.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        config: &HttpClientConfig,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Http(format!(
                    "failed to build HTTP client: {}",
                    e
                )))
            })?;
        debug!("Creating new Anthropic client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: config.endpoint(ANTHROPIC_API_URL, ANTHROPIC_PATH),
        })
    }

    /// Creates a client reading the API key from `ANTHROPIC_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset.
    pub fn from_env(config: &HttpClientConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ProviderError::new(ProviderErrorKind::MissingApiKey(
                "ANTHROPIC_API_KEY".to_string(),
            ))
        })?;
        Self::new(api_key, config)
    }

    /// Builds the messages request for a rendered prompt.
    fn build_request(
        &self,
        model: &Model,
        prompt: String,
    ) -> Result<AnthropicRequest, ProviderError> {
        let message = AnthropicMessage::builder()
            .role("user")
            .content(vec![AnthropicContentBlock::Text { text: prompt }])
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())))?;

        let mut builder = AnthropicRequest::builder()
            .model(model.model_name.clone())
            .max_tokens(model.max_tokens().unwrap_or(DEFAULT_MAX_TOKENS))
            .messages(vec![message]);
        if let Some(temperature) = model.temperature() {
            builder = builder.temperature(Some(temperature));
        }

        builder
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())))
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    async fn perform(
        &self,
        request: &AnthropicRequest,
        cancel: &CancellationToken,
    ) -> Result<AnthropicResponse, ProviderError> {
        debug!("Sending request to Anthropic API");

        let call = async {
            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    error!(error = ?e, "Failed to send request to Anthropic API");
                    ProviderError::new(ProviderErrorKind::Http(format!("request failed: {}", e)))
                })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let body = response.text().await.unwrap_or_default();
                error!(body = %body, "Anthropic API rate limited the request");
                return Err(ProviderError::new(ProviderErrorKind::RateLimited(body)));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Anthropic API returned error");
                return Err(ProviderError::new(ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message: body,
                }));
            }

            response.json::<AnthropicResponse>().await.map_err(|e| {
                error!(error = ?e, "Failed to parse Anthropic response");
                ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
            })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::new(ProviderErrorKind::Cancelled)),
            result = call => result,
        }
    }

    /// Extracts generated content and token usage from a response.
    fn convert_response(
        model_name: &str,
        response: AnthropicResponse,
    ) -> Result<GenerationOutput, ProviderError> {
        let content = response
            .content()
            .iter()
            .map(|block| block.text().as_str())
            .collect::<Vec<_>>()
            .join("");
        if content.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::Parse(
                "response contained no text content".to_string(),
            )));
        }
        let input_tokens = *response.usage().input_tokens();
        let output_tokens = *response.usage().output_tokens();

        Ok(GenerationOutput {
            content,
            input_tokens,
            output_tokens,
            estimated_cost_usd: rates::estimate_cost_usd(model_name, input_tokens + output_tokens),
        })
    }
}

#[async_trait]
impl quizsmith_interface::ProviderClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    #[instrument(
        skip(self, model, template, params, cancel),
        fields(provider = "anthropic", model = %model.model_name, template = %template.name)
    )]
    async fn generate_content(
        &self,
        model: &Model,
        template: &PromptTemplate,
        params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutput, ProviderError> {
        let prompt = template::render_prompt(template, params).map_err(|e| {
            ProviderError::new(match e.kind {
                ValidationErrorKind::Template(message) => ProviderErrorKind::Template(message),
                other => ProviderErrorKind::Template(other.to_string()),
            })
        })?;

        let request = self.build_request(model, prompt)?;
        let response = self.perform(&request, cancel).await?;
        let output = Self::convert_response(&model.model_name, response)?;

        debug!(
            input_tokens = output.input_tokens,
            output_tokens = output.output_tokens,
            "Received completion from Anthropic"
        );
        Ok(output)
    }
}
