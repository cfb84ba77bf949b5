//! Provider client behavior against a local one-shot HTTP server.

use chrono::{NaiveDate, NaiveDateTime};
use quizsmith_core::{Model, PromptTemplate, Provider};
use quizsmith_error::{ProviderErrorKind, RetryableError};
use quizsmith_interface::ProviderClient;
use quizsmith_providers::{AnthropicClient, HttpClientConfig, OpenAiClient};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn model(provider: Provider, model_name: &str) -> Model {
    Model {
        id: 1,
        provider,
        model_name: model_name.to_string(),
        settings: HashMap::from([
            ("temperature".to_string(), "0.2".to_string()),
            ("max_tokens".to_string(), "512".to_string()),
        ]),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn template(text: &str) -> PromptTemplate {
    PromptTemplate {
        id: 1,
        name: "quiz_questions".to_string(),
        category: "multiple_choice".to_string(),
        template_text: text.to_string(),
        parameters: vec!["topic".to_string()],
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn params() -> HashMap<String, String> {
    HashMap::from([("topic".to_string(), "biology".to_string())])
}

/// Serve exactly one canned HTTP response and return the base URL.
async fn serve_once(status_line: &str, body: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 16384];
        let _ = socket.read(&mut buf).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

fn config(base_url: String) -> HttpClientConfig {
    HttpClientConfig {
        base_url: Some(base_url),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn openai_success_extracts_content_and_usage() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"{
            "id": "chatcmpl-1",
            "choices": [{"message": {"role": "assistant", "content": "Q1: What is a cell?"}}],
            "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
        }"#,
    )
    .await;
    let client = OpenAiClient::new("sk-test", &config(base)).unwrap();

    let output = client
        .generate_content(
            &model(Provider::OpenAi, "gpt-4o-mini"),
            &template("Write quiz questions about {{topic}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(output.content, "Q1: What is a cell?");
    assert_eq!(output.input_tokens, 100);
    assert_eq!(output.output_tokens, 50);
    assert_eq!(output.total_tokens(), 150);
    assert!(output.estimated_cost_usd > 0.0);
}

#[tokio::test]
async fn openai_429_surfaces_as_rate_limited() {
    let base = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        r#"{"error": {"message": "Rate limit reached"}}"#,
    )
    .await;
    let client = OpenAiClient::new("sk-test", &config(base)).unwrap();

    let err = client
        .generate_content(
            &model(Provider::OpenAi, "gpt-4o-mini"),
            &template("About {{topic}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_rate_limited(), "429 must map to the rate-limit kind");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn openai_500_surfaces_status_detail() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let client = OpenAiClient::new("sk-test", &config(base)).unwrap();

    let err = client
        .generate_content(
            &model(Provider::OpenAi, "gpt-4o-mini"),
            &template("About {{topic}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match &err.kind {
        ProviderErrorKind::Api { status, .. } => assert_eq!(*status, 500),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn anthropic_success_extracts_content_and_usage() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"{
            "id": "msg_1",
            "content": [{"type": "text", "text": "Q1: Define photosynthesis."}],
            "usage": {"input_tokens": 90, "output_tokens": 35}
        }"#,
    )
    .await;
    let client = AnthropicClient::new("sk-ant-test", &config(base)).unwrap();

    let output = client
        .generate_content(
            &model(Provider::Anthropic, "claude-3-5-sonnet-20241022"),
            &template("Write quiz questions about {{topic}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(output.content, "Q1: Define photosynthesis.");
    assert_eq!(output.total_tokens(), 125);
}

#[tokio::test]
async fn anthropic_429_surfaces_as_rate_limited() {
    let base = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        r#"{"type": "error", "error": {"type": "rate_limit_error"}}"#,
    )
    .await;
    let client = AnthropicClient::new("sk-ant-test", &config(base)).unwrap();

    let err = client
        .generate_content(
            &model(Provider::Anthropic, "claude-3-5-sonnet-20241022"),
            &template("About {{topic}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn template_failure_is_permanent_and_makes_no_call() {
    // Unroutable base URL: if the client attempted a request this would
    // fail with a transport error instead of a template error.
    let client = OpenAiClient::new("sk-test", &config("http://127.0.0.1:1".to_string())).unwrap();

    let err = client
        .generate_content(
            &model(Provider::OpenAi, "gpt-4o-mini"),
            &template("About {{topic}} and {{missing}}."),
            &params(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Template(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn pre_cancelled_token_aborts_before_send() {
    let client = OpenAiClient::new("sk-test", &config("http://127.0.0.1:1".to_string())).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .generate_content(
            &model(Provider::OpenAi, "gpt-4o-mini"),
            &template("About {{topic}}."),
            &params(),
            &cancel,
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Cancelled));
}
