//! Configured upstream model records.

use crate::Provider;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// An upstream model registered with the generation core.
///
/// `settings` is a free-form string map ("temperature" = "0.7",
/// "max_tokens" = "1024"); values that fail to parse are logged and
/// skipped rather than failing the request, since settings are advisory
/// tuning rather than part of the generation contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Database identifier.
    pub id: i32,
    /// Which upstream provider serves this model.
    pub provider: Provider,
    /// Provider-side model identifier (e.g. "gpt-4o-mini").
    pub model_name: String,
    /// Free-form string-keyed configuration.
    pub settings: HashMap<String, String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
}

impl Model {
    /// Sampling temperature from settings, if present and well-formed.
    pub fn temperature(&self) -> Option<f32> {
        self.parse_setting("temperature")
    }

    /// Maximum output tokens from settings, if present and well-formed.
    pub fn max_tokens(&self) -> Option<u32> {
        self.parse_setting("max_tokens")
    }

    fn parse_setting<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.settings.get(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    model = %self.model_name,
                    setting = key,
                    value = %raw,
                    "Ignoring malformed model setting"
                );
                None
            }
        }
    }
}
