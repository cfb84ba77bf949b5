//! Advisory per-model cost rates.
//!
//! Blended USD-per-million-token rates used to attach a cost estimate to
//! each generation. This is telemetry for operators, not authoritative
//! billing; upstream invoices are the source of truth.

use tracing::warn;

/// Blended USD per million tokens for an unrecognized model.
///
/// Deliberately a conservative upper bound: an unknown model should look
/// expensive in telemetry rather than free, so a misconfigured model name
/// is noticed instead of silently under-reported.
pub const DEFAULT_RATE_PER_MILLION_USD: f64 = 30.0;

// Longest prefixes first so e.g. "gpt-4o-mini" does not match "gpt-4o".
const RATES_PER_MILLION_USD: &[(&str, f64)] = &[
    ("gpt-4o-mini", 0.4),
    ("gpt-4o", 7.5),
    ("gpt-4-turbo", 20.0),
    ("gpt-4", 45.0),
    ("gpt-3.5-turbo", 1.0),
    ("claude-3-5-haiku", 2.4),
    ("claude-3-5-sonnet", 9.0),
    ("claude-3-haiku", 0.75),
    ("claude-3-opus", 45.0),
    ("claude-sonnet", 9.0),
    ("claude-opus", 45.0),
    ("claude-haiku", 2.4),
];

/// Blended USD-per-million-token rate for a model name.
///
/// Falls back to [`DEFAULT_RATE_PER_MILLION_USD`] with a warning for
/// unrecognized names.
pub fn rate_per_million_usd(model_name: &str) -> f64 {
    for (prefix, rate) in RATES_PER_MILLION_USD {
        if model_name.starts_with(prefix) {
            return *rate;
        }
    }
    warn!(
        model = model_name,
        default_rate = DEFAULT_RATE_PER_MILLION_USD,
        "No cost rate known for model, using conservative default"
    );
    DEFAULT_RATE_PER_MILLION_USD
}

/// Estimate the USD cost of a call from its total token count.
pub fn estimate_cost_usd(model_name: &str, total_tokens: i64) -> f64 {
    total_tokens.max(0) as f64 / 1_000_000.0 * rate_per_million_usd(model_name)
}
