//! Configuration loading for the generation core.
//!
//! Sources in order of precedence (later overrides earlier):
//! 1. Bundled defaults (`quizsmith.toml` shipped with the workspace)
//! 2. User config in the home directory (`~/.config/quizsmith/quizsmith.toml`)
//! 3. User config in the current directory (`./quizsmith.toml`)

use config::{Config, File, FileFormat};
use quizsmith_database::RetryPolicy;
use quizsmith_error::{ConfigError, QuizsmithResult};
use quizsmith_rate_limit::LimitSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Transport settings for provider clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: u64,

    /// Override for the OpenAI API base URL (tests, proxies).
    #[serde(default)]
    pub openai_base_url: Option<String>,

    /// Override for the Anthropic API base URL (tests, proxies).
    #[serde(default)]
    pub anthropic_base_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            openai_base_url: None,
            anthropic_base_url: None,
        }
    }
}

impl ProviderSettings {
    /// HTTP client configuration for the OpenAI client.
    pub fn openai_http(&self) -> quizsmith_providers::HttpClientConfig {
        quizsmith_providers::HttpClientConfig {
            base_url: self.openai_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// HTTP client configuration for the Anthropic client.
    pub fn anthropic_http(&self) -> quizsmith_providers::HttpClientConfig {
        quizsmith_providers::HttpClientConfig {
            base_url: self.anthropic_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Top-level configuration for the generation core.
///
/// # Example
///
/// ```no_run
/// use quizsmith::QuizsmithConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = QuizsmithConfig::load()?;
/// println!("user RPM: {}", config.limits.user_requests_per_minute);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct QuizsmithConfig {
    /// Admission-control limits.
    #[serde(default)]
    pub limits: LimitSettings,

    /// Retry bounds for transient persistence failures.
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Provider transport settings.
    #[serde(default)]
    pub providers: ProviderSettings,
}

impl QuizsmithConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> QuizsmithResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> QuizsmithResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../quizsmith.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/quizsmith/quizsmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("quizsmith").required(false));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }
}
