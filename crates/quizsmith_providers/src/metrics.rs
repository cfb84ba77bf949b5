//! Metrics for upstream generation calls.
//!
//! OpenTelemetry-based counters and histograms for tracking generation
//! volume, failures, latency, and token usage across provider
//! implementations.

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};
use quizsmith_error::{ProviderError, ProviderErrorKind};
use std::sync::OnceLock;

static METRICS: OnceLock<GenerationMetrics> = OnceLock::new();

/// Metrics for upstream generation calls.
///
/// Labelled with provider and model name.
#[derive(Clone)]
pub struct GenerationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Total generation requests
    pub requests: Counter<u64>,
    /// Failed generation requests
    pub errors: Counter<u64>,
    /// Upstream call duration in seconds
    pub duration: Histogram<f64>,
    /// Total tokens used (input + output)
    pub tokens_used: Counter<u64>,
    /// Feedback ratings received
    pub feedback_ratings: Histogram<u64>,
}

impl GenerationMetrics {
    fn init() -> Self {
        let meter = global::meter("quizsmith_generation");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("generation.requests")
                .with_description("Total generation requests")
                .build(),
            errors: meter
                .u64_counter("generation.errors")
                .with_description("Failed generation requests")
                .build(),
            duration: meter
                .f64_histogram("generation.duration")
                .with_unit("seconds")
                .with_description("Upstream call duration")
                .build(),
            tokens_used: meter
                .u64_counter("generation.tokens")
                .with_description("Total tokens used (input + output)")
                .build(),
            feedback_ratings: meter
                .u64_histogram("generation.feedback_rating")
                .with_description("Feedback ratings received, attributed to models")
                .build(),
        }
    }

    /// Get the global generation metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful generation.
    pub fn record_success(
        &self,
        provider: &str,
        model: &str,
        duration_secs: f64,
        total_tokens: i64,
    ) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
        self.tokens_used.add(total_tokens.max(0) as u64, labels);
    }

    /// Record a failed generation.
    pub fn record_error(&self, provider: &str, model: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.requests.add(1, &labels[..2]);
        self.errors.add(1, labels);
    }

    /// Record a feedback rating attributed to the generating model.
    pub fn record_feedback(&self, model: &str, rating: i32) {
        let labels = &[KeyValue::new("model", model.to_string())];
        self.feedback_ratings.record(rating.max(0) as u64, labels);
    }
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

/// Classify a provider error for metrics labeling.
pub fn error_label(error: &ProviderError) -> &'static str {
    match &error.kind {
        ProviderErrorKind::RateLimited(_) => "rate_limit",
        ProviderErrorKind::Http(_) => "network",
        ProviderErrorKind::Api { status, .. } if *status == 401 || *status == 403 => "auth",
        ProviderErrorKind::Api { .. } => "api",
        ProviderErrorKind::Parse(_) => "parse",
        ProviderErrorKind::Template(_) => "template",
        ProviderErrorKind::Cancelled => "cancelled",
        ProviderErrorKind::MissingApiKey(_) => "auth",
        ProviderErrorKind::InvalidSettings(_) | ProviderErrorKind::Builder(_) => "invalid_request",
        ProviderErrorKind::Unsupported(_) => "unsupported",
    }
}
