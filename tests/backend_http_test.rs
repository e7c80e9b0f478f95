//! Remote-backend behavior against a mock HTTP server.

use intake::backend::{
    AnthropicBackend, BackendError, BackendSelector, ExtractionBackend, GeminiBackend,
    OpenAiBackend,
};
use mockito::Matcher;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

fn openai_reply(content: &str) -> String {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

#[tokio::test]
async fn test_openai_extract_parses_intent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(openai_reply(
            r#"{"task_type": "event", "title": "Meet John", "description": "Meet John tomorrow", "date": "2030-05-01", "time": "14:00"}"#,
        ))
        .create_async()
        .await;

    let backend = OpenAiBackend::new(Some("sk-test".to_string())).with_base_url(server.url());
    let raw = backend.extract("Meet John tomorrow at 2pm").await.unwrap();
    mock.assert_async().await;

    assert_eq!(raw.task_type, "event");
    assert_eq!(raw.title, "Meet John");
    assert_eq!(raw.date.as_deref(), Some("2030-05-01"));
    assert_eq!(raw.time.as_deref(), Some("14:00"));
}

#[tokio::test]
async fn test_openai_extract_tolerates_fenced_json() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply(
            "```json\n{\"task_type\": \"task\", \"title\": \"Buy milk\"}\n```",
        ))
        .create_async()
        .await;

    let backend = OpenAiBackend::new(Some("sk-test".to_string())).with_base_url(server.url());
    let raw = backend.extract("Buy milk").await.unwrap();
    assert_eq!(raw.title, "Buy milk");
}

#[tokio::test]
async fn test_openai_api_error_is_backend_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(json!({ "error": { "message": "Invalid API key" } }).to_string())
        .create_async()
        .await;

    let backend = OpenAiBackend::new(Some("bad-key".to_string())).with_base_url(server.url());
    let err = backend.extract("Buy milk").await.unwrap_err();
    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_split_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(openai_reply(r#"["Buy milk", "Call mom at 15:00"]"#))
        .create_async()
        .await;

    let backend = OpenAiBackend::new(Some("sk-test".to_string())).with_base_url(server.url());
    let segments = backend.split_text("Buy milk and call mom at 15:00").await.unwrap();
    assert_eq!(segments, vec!["Buy milk", "Call mom at 15:00"]);
}

#[tokio::test]
async fn test_openai_check_connection() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let backend = OpenAiBackend::new(Some("sk-test".to_string())).with_base_url(server.url());
    assert!(backend.check_connection().await);

    let unreachable =
        OpenAiBackend::new(Some("sk-test".to_string())).with_base_url("http://127.0.0.1:1");
    assert!(!unreachable.check_connection().await);
}

#[tokio::test]
async fn test_gemini_extract_parses_intent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(r"^/v1beta/models/.+:generateContent".to_string()))
        .match_query(Matcher::UrlEncoded("key".to_string(), "g-key".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": { "parts": [{
                        "text": "{\"task_type\": \"reminder\", \"title\": \"Call John\"}"
                    }] }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let backend = GeminiBackend::new(Some("g-key".to_string())).with_base_url(server.url());
    let raw = backend.extract("remind me to call John").await.unwrap();
    assert_eq!(raw.task_type, "reminder");
    assert_eq!(raw.title, "Call John");
}

#[tokio::test]
async fn test_anthropic_extract_parses_intent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "a-key")
        .with_status(200)
        .with_body(
            json!({
                "content": [{ "type": "text", "text": "{\"task_type\": \"task\", \"title\": \"Buy milk\"}" }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let backend = AnthropicBackend::new(Some("a-key".to_string())).with_base_url(server.url());
    let raw = backend.extract("Buy milk").await.unwrap();
    assert_eq!(raw.task_type, "task");
}

#[tokio::test]
async fn test_anthropic_error_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(400)
        .with_body(
            json!({ "type": "error", "error": { "message": "max_tokens required" } }).to_string(),
        )
        .create_async()
        .await;

    let backend = AnthropicBackend::new(Some("a-key".to_string())).with_base_url(server.url());
    assert!(matches!(
        backend.extract("Buy milk").await.unwrap_err(),
        BackendError::Api { status: 400, .. }
    ));
}

#[tokio::test]
async fn test_selector_recovers_from_failing_remote() {
    // A configured backend pointing at a dead port must degrade to the
    // rule-based parser without surfacing an error.
    let backend =
        OpenAiBackend::new(Some("sk-test".to_string())).with_base_url("http://127.0.0.1:1");
    let selector = BackendSelector::new(vec![Box::new(backend)]);

    let mut rng = StdRng::seed_from_u64(42);
    let raw = selector.extract_with(&mut rng, "remind me to call John").await;
    assert_eq!(raw.task_type, "reminder");
}
