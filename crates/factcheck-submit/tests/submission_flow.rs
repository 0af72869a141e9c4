//! Submission flow from draft to stored result against an in-process backend

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use factcheck_client::FactCheckClient;
use factcheck_domain::{ClaimDraft, MediaType, TrustBand, TrustScoreRenderer};
use factcheck_store::{MemorySlots, SqliteSlots, VerificationResultStore};
use factcheck_submit::{
    AttachmentStager, EntryPoint, PickedFile, StagerConfig, SubmissionController,
    SubmissionError, SubmissionState, View,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

async fn spawn_backend(claims: Arc<Mutex<Vec<Value>>>) -> String {
    let app = Router::new().route(
        "/api/verify-claim",
        post(move |Json(body): Json<Value>| {
            let claims = Arc::clone(&claims);
            async move {
                claims.lock().unwrap().push(body.clone());
                match body["claim"].as_str() {
                    Some("Vaccines cause flu") => Json(json!({
                        "score": 25,
                        "explanation": "contradicted by sources",
                        "evidence": []
                    }))
                    .into_response(),
                    Some("Coffee stunts growth") => Json(json!({
                        "claim": "coffee stunts growth (normalized)",
                        "score": 70
                    }))
                    .into_response(),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        Json(json!({"error": "Upstream unavailable"})),
                    )
                        .into_response(),
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

#[tokio::test]
async fn test_verified_claim_is_stored_and_rendered() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let url = spawn_backend(Arc::clone(&sent)).await;

    let dir = tempfile::tempdir().unwrap();
    let slots = SqliteSlots::new(dir.path().join("factcheck.db")).unwrap();
    let controller =
        SubmissionController::new(FactCheckClient::new(&url), VerificationResultStore::new(slots));
    let view = controller.subscribe();

    let stager = AttachmentStager::new(StagerConfig::instant());
    stager
        .stage(
            EntryPoint::DragDrop,
            vec![PickedFile::from_bytes("chart.png", "image/png", vec![0x89, 0x50])],
        )
        .unwrap();
    stager.wait_idle().await;

    let mut draft = ClaimDraft::new("Vaccines cause flu");
    draft.media_type = MediaType::SocialMediaPost;
    draft.set_source(0, "https://www.who.int/news");
    draft.attachments = stager.take();

    controller.submit(&draft).await.unwrap();
    assert_eq!(controller.state(), SubmissionState::Success);
    assert_eq!(*view.borrow(), View::Result);

    // Only the claim text goes over the wire
    let sent = sent.lock().unwrap().clone();
    assert_eq!(sent, vec![json!({"claim": "Vaccines cause flu"})]);

    // A fresh store over the same file sees the result
    let reopened = VerificationResultStore::new(
        SqliteSlots::new(dir.path().join("factcheck.db")).unwrap(),
    );
    let stored = reopened.read().unwrap();
    assert_eq!(stored.claim_text, "Vaccines cause flu");
    assert_eq!(stored.score, 25);
    assert_eq!(stored.explanation.as_deref(), Some("contradicted by sources"));
    assert!(stored.evidence.is_empty());

    let rendered = TrustScoreRenderer::default().render(stored.score.into());
    assert_eq!(rendered.band, TrustBand::Low);
}

#[tokio::test]
async fn test_submitted_title_wins_over_echoed_claim() {
    let url = spawn_backend(Arc::new(Mutex::new(Vec::new()))).await;
    let slots = MemorySlots::new();
    let controller = SubmissionController::new(
        FactCheckClient::new(&url),
        VerificationResultStore::new(slots.clone()),
    );

    let result = controller
        .submit(&ClaimDraft::new("Coffee stunts growth"))
        .await
        .unwrap();
    assert_eq!(result.claim_text, "Coffee stunts growth");
    assert_eq!(result.score, 70);

    let stored = VerificationResultStore::new(slots).read().unwrap();
    assert_eq!(stored.claim_text, "Coffee stunts growth");
}

#[tokio::test]
async fn test_backend_error_keeps_previous_result() {
    let url = spawn_backend(Arc::new(Mutex::new(Vec::new()))).await;
    let slots = MemorySlots::new();
    let controller = SubmissionController::new(
        FactCheckClient::new(&url),
        VerificationResultStore::new(slots.clone()),
    );

    controller
        .submit(&ClaimDraft::new("Vaccines cause flu"))
        .await
        .unwrap();

    match controller.submit(&ClaimDraft::new("Something else")).await {
        Err(SubmissionError::Transport(message)) => {
            assert!(message.contains("Upstream unavailable"))
        }
        other => panic!("Expected Transport error, got {:?}", other),
    }
    assert_eq!(controller.state(), SubmissionState::Editing);

    let kept = VerificationResultStore::new(slots).read().unwrap();
    assert_eq!(kept.claim_text, "Vaccines cause flu");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let controller = SubmissionController::new(
        FactCheckClient::new("http://127.0.0.1:9/api"),
        VerificationResultStore::new(MemorySlots::new()),
    );
    let err = controller
        .submit(&ClaimDraft::new("Bats are blind"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::Transport(_)));
}
