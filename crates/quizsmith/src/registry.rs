//! Provider client registry.
//!
//! The set of supported providers is closed: the registry constructs
//! exactly the clients this system implements, keyed by [`Provider`]. A
//! model whose provider has no registered client fails with a
//! configuration error before any network call.

use crate::config::ProviderSettings;
use quizsmith_core::Provider;
use quizsmith_error::{ConfigError, ProviderErrorKind, QuizsmithResult};
use quizsmith_interface::ProviderClient;
use quizsmith_providers::{AnthropicClient, OpenAiClient};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Build clients for every provider with credentials in the environment.
///
/// Providers without an API key are skipped with a warning so a deployment
/// can run with a subset of providers configured.
///
/// # Errors
///
/// Returns a configuration error if no provider has credentials, or if a
/// client fails to construct for a reason other than a missing key.
pub fn provider_clients_from_env(
    settings: &ProviderSettings,
) -> QuizsmithResult<HashMap<Provider, Arc<dyn ProviderClient>>> {
    let mut clients: HashMap<Provider, Arc<dyn ProviderClient>> = HashMap::new();

    match OpenAiClient::from_env(&settings.openai_http()) {
        Ok(client) => {
            info!("Registered OpenAI provider client");
            clients.insert(Provider::OpenAi, Arc::new(client));
        }
        Err(e) if matches!(e.kind, ProviderErrorKind::MissingApiKey(_)) => {
            warn!("OPENAI_API_KEY not set, OpenAI provider unavailable");
        }
        Err(e) => return Err(e.into()),
    }

    match AnthropicClient::from_env(&settings.anthropic_http()) {
        Ok(client) => {
            info!("Registered Anthropic provider client");
            clients.insert(Provider::Anthropic, Arc::new(client));
        }
        Err(e) if matches!(e.kind, ProviderErrorKind::MissingApiKey(_)) => {
            warn!("ANTHROPIC_API_KEY not set, Anthropic provider unavailable");
        }
        Err(e) => return Err(e.into()),
    }

    if clients.is_empty() {
        return Err(ConfigError::new(
            "no provider credentials configured (set OPENAI_API_KEY or ANTHROPIC_API_KEY)",
        )
        .into());
    }

    Ok(clients)
}
