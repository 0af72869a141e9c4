//! Integration tests for the HTTP-backed providers
//!
//! Each test serves a small axum app on an ephemeral port and points the
//! real Gemini provider or chat host at it.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use factcheck_llm::{
    DirectProvider, GeminiProvider, HttpChatHost, LlmError, ProviderDispatcher, ProviderKind,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serve `app` on 127.0.0.1 and return its base URL
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
struct GeminiState {
    hits: Arc<AtomicUsize>,
}

async fn generate_content(
    State(state): State<GeminiState>,
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let model = target.trim_end_matches(":generateContent");

    match model {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "busy" => StatusCode::TOO_MANY_REQUESTS.into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "overloaded").into_response(),
        _ => {
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default();
            let key = query.get("key").cloned().unwrap_or_default();
            Json(json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": format!("{} via {}", prompt, model)},
                        {"text": format!(" ({})", key)}
                    ]}
                }]
            }))
            .into_response()
        }
    }
}

async fn gemini_server() -> (String, GeminiState) {
    let state = GeminiState::default();
    let app = Router::new()
        .route("/models/:target", post(generate_content))
        .with_state(state.clone());
    (spawn(app).await, state)
}

async fn chat(Json(body): Json<Value>) -> Response {
    match body["model"].as_str().unwrap_or_default() {
        "ndjson-model" => (
            [(header::CONTENT_TYPE, "application/x-ndjson")],
            "{\"text\":\"Hel\"}\n{\"text\":\"\"}\n{}\n{\"text\":\"lo\"}\n",
        )
            .into_response(),
        "sse-model" => (
            [(header::CONTENT_TYPE, "text/event-stream")],
            "data: {\"text\":\"Stre\"}\n\ndata: {\"text\":\"amed\"}\n\ndata: [DONE]\n\n",
        )
            .into_response(),
        "json-model" => Json(json!({
            "message": {"role": "assistant", "content": format!("echo: {}", body["message"].as_str().unwrap_or_default())}
        }))
        .into_response(),
        "text-model" => "raw words".into_response(),
        "missing" => StatusCode::NOT_FOUND.into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "host exploded").into_response(),
    }
}

async fn host_server() -> String {
    spawn(Router::new().route("/chat", post(chat))).await
}

fn hosted(endpoint: &str, gpt: &str, grok: &str) -> ProviderDispatcher {
    let gemini = GeminiProvider::new(endpoint, "unused", "unused").with_max_retries(1);
    ProviderDispatcher::new(Arc::new(gemini), Arc::new(HttpChatHost::new(endpoint)))
        .with_models(gpt, grok)
}

#[tokio::test]
async fn test_gemini_generate_content() {
    let (url, state) = gemini_server().await;
    let provider = GeminiProvider::new(&url, "test-key", "gemini-test");

    let reply = provider.generate("Is water wet?").await.unwrap();
    assert_eq!(reply, "Is water wet? via gemini-test (test-key)");
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gemini_status_mapping() {
    let (url, state) = gemini_server().await;

    let missing = GeminiProvider::new(&url, "k", "missing").generate("x").await;
    assert!(matches!(missing, Err(LlmError::ModelNotAvailable(m)) if m == "missing"));

    let busy = GeminiProvider::new(&url, "k", "busy").generate("x").await;
    assert!(matches!(busy, Err(LlmError::RateLimitExceeded)));

    // Neither is retried
    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_gemini_server_error_is_retried() {
    let (url, state) = gemini_server().await;
    let provider = GeminiProvider::new(&url, "k", "broken").with_max_retries(2);

    let result = provider.generate("x").await;
    match result {
        Err(LlmError::Communication(msg)) => assert!(msg.contains("overloaded")),
        other => panic!("Expected Communication error, got {:?}", other),
    }
    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_host_ndjson_stream() {
    let url = host_server().await;
    let dispatcher = hosted(&url, "ndjson-model", "sse-model");
    dispatcher.set_provider(ProviderKind::Gpt);

    assert_eq!(dispatcher.send_message("hi").await.unwrap(), "Hello");
}

#[tokio::test]
async fn test_host_sse_stream() {
    let url = host_server().await;
    let dispatcher = hosted(&url, "ndjson-model", "sse-model");
    dispatcher.set_provider(ProviderKind::Grok);

    assert_eq!(dispatcher.send_message("hi").await.unwrap(), "Streamed");
}

#[tokio::test]
async fn test_host_message_object_and_plain_text() {
    let url = host_server().await;
    let dispatcher = hosted(&url, "json-model", "text-model");

    dispatcher.set_provider(ProviderKind::Gpt);
    assert_eq!(
        dispatcher.send_message("ping").await.unwrap(),
        "echo: ping"
    );

    dispatcher.set_provider(ProviderKind::Grok);
    assert_eq!(dispatcher.send_message("ping").await.unwrap(), "raw words");
}

#[tokio::test]
async fn test_host_errors_become_dispatch_errors() {
    let url = host_server().await;
    let dispatcher = hosted(&url, "missing", "anything-else");

    dispatcher.set_provider(ProviderKind::Gpt);
    let err = dispatcher.send_message("hi").await.unwrap_err();
    assert_eq!(err.provider, ProviderKind::Gpt);
    assert!(err.message.contains("missing"));

    dispatcher.set_provider(ProviderKind::Grok);
    let err = dispatcher.send_message("hi").await.unwrap_err();
    assert!(err.message.contains("host exploded"));
    assert_eq!(dispatcher.last_error(), Some(err.message));
}
