//! End-to-end orchestrator tests over in-memory collaborators.

mod support;

use quizsmith::{
    GenerateContentRequest, GenerationOrchestrator, LimitSettings, ProviderClient, RateLimiter,
    SystemClock,
};
use quizsmith_core::{GenerationStatus, Provider};
use quizsmith_error::{
    LimitScope, ProviderError, ProviderErrorKind, QuizsmithErrorKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use support::{test_model, test_output, test_params, test_template, InMemoryStore, MockProvider};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const USER: i64 = 42;

fn limits(rpm: u32, tokens_per_day: i64) -> LimitSettings {
    LimitSettings {
        user_requests_per_minute: rpm,
        user_tokens_per_day: tokens_per_day,
        provider_rpm: HashMap::from([(Provider::OpenAi, 30), (Provider::Anthropic, 30)]),
    }
}

fn orchestrator(
    store: Arc<InMemoryStore>,
    provider: Arc<MockProvider>,
    limits: LimitSettings,
) -> GenerationOrchestrator<InMemoryStore> {
    quizsmith::telemetry::init_console_telemetry().ok();
    let rate_limiter = Arc::new(RateLimiter::new(limits, Arc::new(SystemClock)).unwrap());
    let mut providers: HashMap<Provider, Arc<dyn ProviderClient>> = HashMap::new();
    providers.insert(provider.provider(), provider);
    GenerationOrchestrator::new(store, rate_limiter, providers)
}

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_model(test_model(1, Provider::OpenAi, "gpt-4o-mini"));
    store.insert_template(test_template(1));
    store
}

fn request() -> GenerateContentRequest {
    GenerateContentRequest {
        user_id: USER,
        model_id: 1,
        prompt_template_id: 1,
        params: test_params(),
    }
}

#[tokio::test]
async fn happy_path_completes_generation_and_audits() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(100, 50),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(10, 10_000));

    let generation = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(generation.status, GenerationStatus::Completed);
    assert_eq!(generation.generated_content, "Q1: What is a cell?");
    assert_eq!(generation.tokens_used, 150);
    assert_eq!(provider.call_count(), 1);

    let stored = store.generation(generation.id);
    assert_eq!(stored.status, GenerationStatus::Completed);

    let interactions = store.interactions();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].status, GenerationStatus::Completed);
    assert_eq!(interactions[0].tokens_used, 150);
    assert_eq!(interactions[0].model_name, "gpt-4o-mini");
    assert!(interactions[0].error_message.is_none());

    let stats = orchestrator
        .get_user_stats(USER, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stats.total_interactions, 1);
    assert_eq!(stats.total_tokens, 150);
    assert_eq!(stats.remaining_daily_tokens, 10_000 - 150);
    assert_eq!(stats.daily_token_limit, 10_000);
}

#[tokio::test]
async fn provider_failure_marks_generation_failed_and_propagates() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::failing(
        Provider::OpenAi,
        ProviderError::new(ProviderErrorKind::Api {
            status: 500,
            message: "upstream exploded".to_string(),
        }),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(10, 10_000));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    // The provider error is surfaced, not swallowed.
    match err.kind() {
        QuizsmithErrorKind::Provider(e) => assert!(e.to_string().contains("500")),
        other => panic!("expected Provider error, got {other:?}"),
    }

    // The record is terminal failed, never left pending.
    let generation = store.sole_generation();
    assert_eq!(generation.status, GenerationStatus::Failed);
    assert!(generation.generated_content.is_empty());
    assert_eq!(generation.tokens_used, 0);

    let interactions = store.interactions();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].status, GenerationStatus::Failed);
    assert!(interactions[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("upstream exploded"));
}

#[tokio::test]
async fn provider_429_surfaces_as_rate_limit_condition() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::failing(
        Provider::OpenAi,
        ProviderError::new(ProviderErrorKind::RateLimited("slow down".to_string())),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), provider, limits(10, 10_000));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind() {
        QuizsmithErrorKind::Provider(e) => assert!(e.is_rate_limited()),
        other => panic!("expected rate-limited Provider error, got {other:?}"),
    }
    assert_eq!(store.sole_generation().status, GenerationStatus::Failed);
}

#[tokio::test]
async fn user_rpm_rejection_has_no_side_effects() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(10, 10),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(1, 10_000));

    orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap();

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();
    match err.kind() {
        QuizsmithErrorKind::RateLimit(e) => {
            assert_eq!(e.scope(), Some(LimitScope::RequestsPerMinute));
        }
        other => panic!("expected RateLimit error, got {other:?}"),
    }

    // No second generation row, no second upstream call.
    assert_eq!(store.generation_count(), 1);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn missing_model_is_a_validation_error() {
    let store = Arc::new(InMemoryStore::new());
    store.insert_template(test_template(1));
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(10, 10),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(10, 10_000));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind() {
        QuizsmithErrorKind::Validation(e) => assert!(e.to_string().contains("model")),
        other => panic!("expected Validation error, got {other:?}"),
    }
    assert_eq!(store.generation_count(), 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_without_client_is_a_configuration_error() {
    let store = Arc::new(InMemoryStore::new());
    store.insert_model(test_model(1, Provider::Anthropic, "claude-3-5-sonnet-20241022"));
    store.insert_template(test_template(1));
    // Only an OpenAI client is registered.
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(10, 10),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(10, 10_000));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind() {
        QuizsmithErrorKind::Config(e) => assert!(e.to_string().contains("anthropic")),
        other => panic!("expected Config error, got {other:?}"),
    }
    // Rejected before the durability point: no pending row, no call.
    assert_eq!(store.generation_count(), 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn quota_exhaustion_after_success_still_finalizes_the_generation() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(100, 50),
    ));
    // Daily budget below the tokens this call will consume.
    let orchestrator = orchestrator(Arc::clone(&store), provider, limits(10, 100));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind() {
        QuizsmithErrorKind::RateLimit(e) => {
            assert_eq!(e.scope(), Some(LimitScope::TokenQuota));
        }
        other => panic!("expected token quota error, got {other:?}"),
    }

    // The content was already produced: the record keeps its real tokens.
    let generation = store.sole_generation();
    assert_eq!(generation.status, GenerationStatus::Completed);
    assert_eq!(generation.tokens_used, 150);
    assert_eq!(store.interactions().len(), 1);
}

#[tokio::test]
async fn completion_persistence_failure_surfaces_without_reinvoking_provider() {
    let store = seeded_store();
    store
        .fail_completion
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(100, 50),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), Arc::clone(&provider), limits(10, 10_000));

    let err = orchestrator
        .generate_content(request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind() {
        QuizsmithErrorKind::Database(_) => {}
        other => panic!("expected Database error, got {other:?}"),
    }
    // Partial completion surfaces as an error; the paid upstream call is
    // never silently repeated.
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn feedback_rating_is_range_checked() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(10, 10),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), provider, limits(10, 10_000));
    let cancel = CancellationToken::new();

    let generation = orchestrator
        .generate_content(request(), &cancel)
        .await
        .unwrap();

    for bad in [0, 6, -1] {
        let err = orchestrator
            .save_feedback(USER, generation.id, bad, None, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), QuizsmithErrorKind::Validation(_)));
    }

    let feedback = orchestrator
        .save_feedback(USER, generation.id, 4, Some("solid questions".to_string()), &cancel)
        .await
        .unwrap();
    assert_eq!(feedback.rating, 4);
    assert_eq!(feedback.generation_id, generation.id);
}

#[tokio::test]
async fn feedback_for_unknown_generation_is_a_validation_error() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(10, 10),
    ));
    let orchestrator = orchestrator(store, provider, limits(10, 10_000));

    let err = orchestrator
        .save_feedback(USER, Uuid::new_v4(), 3, None, &CancellationToken::new())
        .await
        .unwrap_err();
    match err.kind() {
        QuizsmithErrorKind::Validation(e) => assert!(e.to_string().contains("generation")),
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn user_stats_average_is_computed_from_totals() {
    let store = seeded_store();
    let provider = Arc::new(MockProvider::succeeding(
        Provider::OpenAi,
        test_output(40, 20),
    ));
    let orchestrator = orchestrator(Arc::clone(&store), provider, limits(10, 10_000));
    let cancel = CancellationToken::new();

    orchestrator
        .generate_content(request(), &cancel)
        .await
        .unwrap();
    orchestrator
        .generate_content(request(), &cancel)
        .await
        .unwrap();

    let stats = orchestrator.get_user_stats(USER, &cancel).await.unwrap();
    assert_eq!(stats.total_interactions, 2);
    assert_eq!(stats.total_tokens, 120);
    assert_eq!(stats.error_count, 0);
    assert_eq!(stats.remaining_daily_tokens, 10_000 - 120);

    // Stats reads mutate nothing.
    let again = orchestrator.get_user_stats(USER, &cancel).await.unwrap();
    assert_eq!(stats, again);
}
