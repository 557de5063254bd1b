//! Integration tests for the AI backends using wiremock HTTP mocks.

use std::time::Duration;

use mediaintel_core::AiProvider;
use mediaintel_enrich::{
    Enrichment, EnrichmentPort, EnrichmentRequest, EnrichmentTask, GeminiClient, OpenRouterClient,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(provider: AiProvider, timeout: Duration) -> EnrichmentRequest {
    EnrichmentRequest {
        task: EnrichmentTask::ChartInsights,
        chart_summary: "Sentiment distribution over 40 records".to_string(),
        drafts: vec![
            "positive posts make up 55.0% of the total".to_string(),
            "positive outnumber negative 2.75:1".to_string(),
            "neutral posts account for 25.0%".to_string(),
        ],
        provider,
        timeout,
    }
}

fn openrouter(base_url: &str) -> OpenRouterClient {
    OpenRouterClient::with_base_url("test-key", "google/gemini-2.0-flash-001", 5, base_url)
        .expect("client construction should not fail")
}

fn gemini(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("gem-key", "gemini-2.0-flash", 5, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn openrouter_returns_first_choice() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "id": "gen-1",
        "choices": [
            { "message": { "role": "assistant", "content": "line one\nline two\nline three" } }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(
            serde_json::json!({ "model": "google/gemini-2.0-flash-001" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = openrouter(&server.uri());
    let out = client
        .elaborate(&request(AiProvider::OpenRouter, Duration::from_secs(5)))
        .await;
    assert_eq!(
        out,
        Enrichment::Elaborated("line one\nline two\nline three".to_string())
    );
}

#[tokio::test]
async fn openrouter_server_error_is_unavailable_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let out = openrouter(&server.uri())
        .elaborate(&request(AiProvider::OpenRouter, Duration::from_secs(5)))
        .await;
    assert!(matches!(out, Enrichment::Unavailable(_)));
}

#[tokio::test]
async fn openrouter_error_body_is_unavailable() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "error": { "message": "invalid model", "code": 400 } });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let out = openrouter(&server.uri())
        .elaborate(&request(AiProvider::OpenRouter, Duration::from_secs(5)))
        .await;
    assert!(matches!(out, Enrichment::Unavailable(ref m) if m.contains("invalid model")));
}

#[tokio::test]
async fn openrouter_empty_choices_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let out = openrouter(&server.uri())
        .elaborate(&request(AiProvider::OpenRouter, Duration::from_secs(5)))
        .await;
    assert!(out.text().is_none());
}

#[tokio::test]
async fn slow_provider_hits_the_hard_timeout() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "choices": [ { "message": { "content": "late" } } ] });
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&body)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let out = openrouter(&server.uri())
        .elaborate(&request(AiProvider::OpenRouter, Duration::from_millis(200)))
        .await;
    assert!(matches!(out, Enrichment::Unavailable(ref m) if m.contains("timed out")));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn gemini_joins_candidate_parts() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": "Summary:\n" }, { "text": "Strong week." } ] } }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "gem-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let out = gemini(&server.uri())
        .elaborate(&request(AiProvider::Gemini, Duration::from_secs(5)))
        .await;
    assert_eq!(out.text(), Some("Summary:\nStrong week."));
}

#[tokio::test]
async fn gemini_malformed_body_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let out = gemini(&server.uri())
        .elaborate(&request(AiProvider::Gemini, Duration::from_secs(5)))
        .await;
    assert!(matches!(out, Enrichment::Unavailable(ref m) if m.contains("deserialization")));
}
