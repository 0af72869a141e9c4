//! FactCheck backend client implementation.

use crate::error::ClientError;
use crate::wire::{
    ChatRequest, ChatResponse, ClaimsResponse, ErrorBody, LoginRequest, LoginResponse,
    SignupRequest, SignupResponse, UserProfile, VerifyClaimRequest, VerifyTokenResponse,
};
use async_trait::async_trait;
use factcheck_domain::{ClaimRecord, VerificationPayload};
use factcheck_llm::ChatBackend;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default timeout for backend requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Context label sent with chat messages
pub const DEFAULT_CHAT_CONTEXT: &str = "general";

/// Reply used when the chat endpoint answers without text
pub const CLARIFICATION_REPLY: &str = "I understand your question, but I need a little more detail to give a useful answer. Could you rephrase it or add some context?";

/// FactCheck backend client
///
/// Every request carries `Authorization: Bearer <token>` once a token has
/// been set.
pub struct FactCheckClient {
    base_url: String,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl FactCheckClient {
    /// Create a client for the backend at `base_url` (e.g. "http://localhost:5000/api")
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: RwLock::new(None),
        }
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set or clear the bearer token
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = token;
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Submit a claim for verification
    ///
    /// Only the claim title is transmitted. The response is returned in
    /// whatever shape the backend used; normalize it with
    /// [`VerificationPayload::into_result`].
    pub async fn verify_claim(&self, claim: &str) -> Result<VerificationPayload, ClientError> {
        info!("Submitting claim for verification");
        let builder = self
            .request(Method::POST, "verify-claim")
            .json(&VerifyClaimRequest {
                claim: claim.to_string(),
            });
        self.send_json(builder).await
    }

    /// Fetch the claim catalogue
    pub async fn list_claims(&self) -> Result<Vec<ClaimRecord>, ClientError> {
        let response: ClaimsResponse = self.send_json(self.request(Method::GET, "claims")).await?;
        debug!(count = response.claims.len(), "Fetched claim catalogue");
        Ok(response.claims)
    }

    /// Exchange credentials for a token
    ///
    /// A response with `success: false` is returned as-is; callers decide
    /// how to surface its message.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let builder = self.request(Method::POST, "login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send_json(builder).await
    }

    /// Create an account
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ClientError> {
        self.send_json(self.request(Method::POST, "signup").json(request))
            .await
    }

    /// Check a token and fetch the profile behind it
    pub async fn verify_token(&self, token: &str) -> Result<UserProfile, ClientError> {
        let builder = self
            .http
            .get(self.url("verify-token"))
            .bearer_auth(token);
        let response: VerifyTokenResponse = self.send_json(builder).await?;
        response
            .user
            .ok_or_else(|| ClientError::Decode("verify-token response has no user".to_string()))
    }

    /// Send a message to the backend chat endpoint
    ///
    /// Returns `response`, else `message`, else a clarification prompt.
    pub async fn chat(&self, message: &str, context: &str) -> Result<String, ClientError> {
        let builder = self.request(Method::POST, "chat").json(&ChatRequest {
            message: message.to_string(),
            context: context.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        let response: ChatResponse = self.send_json(builder).await?;
        Ok(response
            .response
            .filter(|s| !s.is_empty())
            .or(response.message.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| CLARIFICATION_REPLY.to_string()))
    }
}

#[async_trait]
impl ChatBackend for FactCheckClient {
    type Error = ClientError;

    async fn send(&self, message: &str) -> Result<String, Self::Error> {
        self.chat(message, DEFAULT_CHAT_CONTEXT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = FactCheckClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("verify-claim"),
            "http://localhost:5000/api/verify-claim"
        );
        assert_eq!(client.url("/claims"), "http://localhost:5000/api/claims");
    }

    #[test]
    fn test_token_set_and_clear() {
        let client = FactCheckClient::new(DEFAULT_API_URL);
        assert!(client.token().is_none());

        client.set_token(Some("abc".to_string()));
        assert_eq!(client.token().as_deref(), Some("abc"));

        client.set_token(None);
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let client = FactCheckClient::new("http://127.0.0.1:9");
        let result = client.list_claims().await;
        assert!(matches!(result, Err(ClientError::Connection(_))));
    }
}
