//! Upstream provider identifiers.

use serde::{Deserialize, Serialize};

/// The closed set of upstream text-generation providers.
///
/// Models reference providers by the lowercase string stored in their row
/// (`"openai"`, `"anthropic"`); parsing an unrecognized string fails before
/// any client is dispatched, so an unsupported provider is an explicit
/// error case rather than a runtime surprise.
///
/// # Examples
///
/// ```
/// use quizsmith_core::Provider;
/// use std::str::FromStr;
///
/// assert_eq!(Provider::from_str("openai").unwrap(), Provider::OpenAi);
/// assert_eq!(Provider::Anthropic.to_string(), "anthropic");
/// assert!(Provider::from_str("cohere").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions API.
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
}

impl Provider {
    /// The lowercase wire/storage name of this provider.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
