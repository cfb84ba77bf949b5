//! Tests for configuration loading.

use quizsmith::{Provider, QuizsmithConfig};
use std::io::Write;

#[test]
fn defaults_are_sane() {
    let config = QuizsmithConfig::default();
    assert_eq!(config.limits.user_requests_per_minute, 20);
    assert_eq!(config.limits.user_tokens_per_day, 100_000);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.providers.request_timeout_secs, 60);
}

#[test]
fn bundled_defaults_parse() {
    let config = QuizsmithConfig::load().unwrap();
    assert!(config.limits.user_requests_per_minute > 0);
    assert!(config.limits.user_tokens_per_day > 0);
    assert!(config.limits.provider_rpm.contains_key(&Provider::OpenAi));
    assert!(config
        .limits
        .provider_rpm
        .contains_key(&Provider::Anthropic));
    config.limits.validate().unwrap();
}

#[test]
fn config_from_file_overrides_everything_it_names() {
    use tempfile::Builder;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        temp_file,
        r#"
[limits]
user_requests_per_minute = 5
user_tokens_per_day = 2000

[limits.provider_rpm]
openai = 7

[retry]
max_attempts = 6
base_delay_ms = 250

[providers]
request_timeout_secs = 15
openai_base_url = "http://localhost:8089"
"#
    )
    .unwrap();

    let config = QuizsmithConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(config.limits.user_requests_per_minute, 5);
    assert_eq!(config.limits.user_tokens_per_day, 2000);
    assert_eq!(config.limits.provider_rpm[&Provider::OpenAi], 7);
    assert_eq!(config.retry.max_attempts, 6);
    assert_eq!(config.retry.base_delay_ms, 250);
    assert_eq!(config.providers.request_timeout_secs, 15);
    assert_eq!(
        config.providers.openai_base_url.as_deref(),
        Some("http://localhost:8089")
    );
}

#[test]
fn missing_file_is_an_error() {
    assert!(QuizsmithConfig::from_file("/nonexistent/quizsmith.toml").is_err());
}
