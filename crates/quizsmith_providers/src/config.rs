//! HTTP client configuration shared by provider implementations.

use std::time::Duration;

/// Transport settings for a provider client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Override for the provider's API base URL (tests, proxies).
    pub base_url: Option<String>,
    /// Per-request timeout for the upstream call.
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl HttpClientConfig {
    /// Resolve the endpoint for a provider-specific path.
    pub(crate) fn endpoint(&self, default_url: &str, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => default_url.to_string(),
        }
    }
}
