//! In-process fake of the FactCheck backend

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const GOOD_TOKEN: &str = "good-token";
pub const GOOD_PASSWORD: &str = "correct1";

/// Authorization headers seen by the fake, in request order
#[derive(Clone, Default)]
pub struct Seen {
    pub auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth.lock().unwrap().push(value);
    }

    pub fn last_auth(&self) -> Option<String> {
        self.auth.lock().unwrap().last().cloned().flatten()
    }
}

fn user() -> Value {
    json!({"id": 1, "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace"})
}

async fn verify_claim(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    seen.record(&headers);
    match body["claim"].as_str().unwrap_or_default() {
        "fail" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Verification failed"})),
        )
            .into_response(),
        "nested" => Json(json!({
            "result": {
                "score": 80,
                "explanation": "well supported",
                "evidence": [{"title": "Source", "link": "https://example.com", "snippet": "..."}]
            }
        }))
        .into_response(),
        _ => Json(json!({
            "score": 25,
            "explanation": "contradicted by sources",
            "evidence": []
        }))
        .into_response(),
    }
}

async fn claims(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers);
    Json(json!({
        "claims": [
            {"id": 1, "text": "The Earth is round", "explanation": "Observed directly",
             "verdict": "true", "score": 98, "timestamp": "2024-03-01T10:00:00Z",
             "sources": [{"name": "NASA", "url": "https://www.nasa.gov"}]},
            {"id": "b2", "text": "Bats are blind", "explanation": "Most bats can see",
             "verdict": "false", "score": 12, "timestamp": "2024-03-02T10:00:00Z"},
            {"id": 3, "text": "Coffee stunts growth", "explanation": "Evidence is weak",
             "verdict": "mixed", "score": 45, "timestamp": "2024-03-03T10:00:00Z"}
        ]
    }))
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == GOOD_PASSWORD {
        Json(json!({"success": true, "token": GOOD_TOKEN, "user": user()}))
    } else {
        Json(json!({"success": false, "message": "Invalid credentials"}))
    }
}

async fn signup(Json(body): Json<Value>) -> Json<Value> {
    if body["email"] == "taken@example.com" {
        Json(json!({"success": false, "message": "Email already registered"}))
    } else if body["firstName"].is_string() && body["phone"].is_string() {
        Json(json!({"success": true, "message": "Account created"}))
    } else {
        Json(json!({"success": false, "message": "Malformed request"}))
    }
}

async fn verify_token(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {}", GOOD_TOKEN);
    let given = headers.get("authorization").and_then(|v| v.to_str().ok());
    if given == Some(expected.as_str()) {
        Json(json!({"user": user()})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid token"})),
        )
            .into_response()
    }
}

async fn chat(Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or_default();
    match message {
        "silent" => Json(json!({})).into_response(),
        "alt" => Json(json!({"message": "alt reply"})).into_response(),
        "crash" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ if !body["timestamp"].is_string() => StatusCode::BAD_REQUEST.into_response(),
        _ => {
            Json(json!({
                "response": format!("echo {} [{}]", message, body["context"].as_str().unwrap_or_default())
            }))
            .into_response()
        }
    }
}

/// Start the fake backend and return its `/api` base URL
pub async fn spawn_backend() -> (String, Seen) {
    let seen = Seen::default();

    let api = Router::new()
        .route("/verify-claim", post(verify_claim))
        .route("/claims", get(claims))
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/verify-token", get(verify_token))
        .route("/chat", post(chat))
        .with_state(seen.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api", addr), seen)
}
