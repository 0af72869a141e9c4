//! The verification service seam

use async_trait::async_trait;
use factcheck_client::{ClientError, FactCheckClient};
use factcheck_domain::{AttachmentSummary, ClaimDraft, MediaType, VerificationResult};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a submission sends for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Claim title, trimmed
    pub claim: String,
    /// Description, trimmed
    pub description: String,
    /// Non-empty sources, trimmed
    pub sources: Vec<String>,
    /// Where the claim was seen
    pub media_type: MediaType,
    /// Attachment names and previews
    pub attachments: Vec<AttachmentSummary>,
}

impl VerificationRequest {
    /// Build the request for a validated draft
    pub fn from_draft(draft: &ClaimDraft) -> Self {
        Self {
            claim: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            sources: draft.cleaned_sources(),
            media_type: draft.media_type,
            attachments: draft.attachment_summaries(),
        }
    }
}

/// A remote service that scores claims
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Error type for verification calls
    type Error: Display + Send;

    /// Verify a claim
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, Self::Error>;
}

#[async_trait]
impl<V: VerificationService + ?Sized> VerificationService for Arc<V> {
    type Error = V::Error;

    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, Self::Error> {
        (**self).verify(request).await
    }
}

/// The backend only takes the claim text; the rest of the draft stays local.
#[async_trait]
impl VerificationService for FactCheckClient {
    type Error = ClientError;

    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, ClientError> {
        let payload = self.verify_claim(&request.claim).await?;
        // The submitted title is stored even when the backend echoes its own claim text
        let mut result = payload.into_result(&request.claim);
        result.claim_text = request.claim.clone();
        Ok(result)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Score(i64, Option<String>),
    Fail(String),
}

/// Deterministic verification service for testing
///
/// Unknown claims score 50 with no explanation.
#[derive(Debug, Clone, Default)]
pub struct MockVerifier {
    scripted: Arc<Mutex<HashMap<String, Scripted>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<VerificationRequest>>>,
}

impl MockVerifier {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `claim` with a score and explanation
    pub fn respond(&self, claim: impl Into<String>, score: i64, explanation: Option<&str>) {
        self.scripted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(claim.into(), Scripted::Score(score, explanation.map(str::to_string)));
    }

    /// Fail `claim` with a message
    pub fn fail(&self, claim: impl Into<String>, message: impl Into<String>) {
        self.scripted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(claim.into(), Scripted::Fail(message.into()));
    }

    /// Delay the answer for `claim`
    pub fn delay(&self, claim: impl Into<String>, delay: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(claim.into(), delay);
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl VerificationService for MockVerifier {
    type Error = String;

    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult, String> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());

        let delay = self
            .delays
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&request.claim)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&request.claim)
            .cloned();
        match scripted {
            Some(Scripted::Fail(message)) => Err(message),
            Some(Scripted::Score(score, explanation)) => {
                let mut result = VerificationResult::new(&request.claim, score);
                result.explanation = explanation;
                Ok(result)
            }
            None => Ok(VerificationResult::new(&request.claim, 50)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factcheck_domain::Attachment;

    #[test]
    fn test_request_from_draft() {
        let mut draft = ClaimDraft::new("  Bats are blind ");
        draft.description = " they are not ".to_string();
        draft.set_source(0, " https://example.com ");
        draft.add_source();
        draft.media_type = MediaType::Video;
        draft.attachments.push(Attachment {
            id: Default::default(),
            name: "bat.png".to_string(),
            mime_type: "image/png".to_string(),
            preview_data_uri: "data:image/png;base64,AA==".to_string(),
        });

        let request = VerificationRequest::from_draft(&draft);
        assert_eq!(request.claim, "Bats are blind");
        assert_eq!(request.description, "they are not");
        assert_eq!(request.sources, vec!["https://example.com".to_string()]);
        assert_eq!(request.media_type, MediaType::Video);
        assert_eq!(request.attachments.len(), 1);
        assert_eq!(request.attachments[0].name, "bat.png");
    }

    #[tokio::test]
    async fn test_mock_verifier() {
        let mock = MockVerifier::new();
        mock.respond("a", 120, Some("strong"));
        mock.fail("b", "backend down");

        let request = |claim: &str| VerificationRequest::from_draft(&ClaimDraft::new(claim));
        let a = mock.verify(&request("a")).await.unwrap();
        assert_eq!(a.score, 100);
        assert_eq!(a.explanation.as_deref(), Some("strong"));
        assert_eq!(mock.verify(&request("b")).await.unwrap_err(), "backend down");
        assert_eq!(mock.verify(&request("c")).await.unwrap().score, 50);
        assert_eq!(mock.call_count(), 3);
    }
}
