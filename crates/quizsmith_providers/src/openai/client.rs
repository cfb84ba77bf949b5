//! OpenAI chat completions client.

use crate::openai::{OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiRole};
use crate::{rates, HttpClientConfig};
use async_trait::async_trait;
use quizsmith_core::{template, GenerationOutput, Model, PromptTemplate, Provider};
use quizsmith_error::{ProviderError, ProviderErrorKind, ValidationErrorKind};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_PATH: &str = "/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI client.
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
        debug!("Creating new OpenAI client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: config.endpoint(OPENAI_API_URL, OPENAI_PATH),
        })
    }

    /// Creates a client reading the API key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset.
    pub fn from_env(config: &HttpClientConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::new(ProviderErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()))
        })?;
        Self::new(api_key, config)
    }

    /// Builds the chat completions request for a rendered prompt.
    fn build_request(&self, model: &Model, prompt: String) -> Result<OpenAiRequest, ProviderError> {
        let message = OpenAiMessage::builder()
            .role(OpenAiRole::User)
            .content(prompt)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())))?;

        let mut builder = OpenAiRequest::builder()
            .model(model.model_name.clone())
            .messages(vec![message]);
        if let Some(temperature) = model.temperature() {
            builder = builder.temperature(Some(temperature));
        }
        if let Some(max_tokens) = model.max_tokens() {
            builder = builder.max_tokens(Some(max_tokens));
        }

        builder
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(e.to_string())))
    }

    /// Sends a request to the OpenAI API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    async fn perform(
        &self,
        request: &OpenAiRequest,
        cancel: &CancellationToken,
    ) -> Result<OpenAiResponse, ProviderError> {
        debug!("Sending request to OpenAI API");

        let call = async {
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    error!(error = ?e, "Failed to send request to OpenAI API");
                    ProviderError::new(ProviderErrorKind::Http(format!("request failed: {}", e)))
                })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let body = response.text().await.unwrap_or_default();
                error!(body = %body, "OpenAI API rate limited the request");
                return Err(ProviderError::new(ProviderErrorKind::RateLimited(body)));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "OpenAI API returned error");
                return Err(ProviderError::new(ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message: body,
                }));
            }

            response.json::<OpenAiResponse>().await.map_err(|e| {
                error!(error = ?e, "Failed to parse OpenAI response");
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
        response: OpenAiResponse,
    ) -> Result<GenerationOutput, ProviderError> {
        let choice = response.choices().first().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Parse(
                "response contained no choices".to_string(),
            ))
        })?;
        let content = choice.message().content().clone();
        let input_tokens = *response.usage().prompt_tokens();
        let output_tokens = *response.usage().completion_tokens();

        Ok(GenerationOutput {
            content,
            input_tokens,
            output_tokens,
            estimated_cost_usd: rates::estimate_cost_usd(model_name, input_tokens + output_tokens),
        })
    }
}

#[async_trait]
impl quizsmith_interface::ProviderClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    #[instrument(
        skip(self, model, template, params, cancel),
        fields(provider = "openai", model = %model.model_name, template = %template.name)
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
            "Received completion from OpenAI"
        );
        Ok(output)
    }
}
