//! FactCheck AI Provider Layer
//!
//! Multi-provider chat dispatch for the assistant widget.
//!
//! # Architecture
//!
//! Three providers sit behind one contract. Gemini is called directly over
//! its REST API; GPT and Grok go through a shared chat host whose replies
//! come back in one of several shapes (chunk streams, message objects, plain
//! strings). [`ProviderDispatcher`] normalizes all of them to a `String` and
//! [`ChatAssistant`] layers canned answers and keyword fallbacks on top.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Gemini `generateContent` REST integration
//! - `HttpChatHost` / `MockHost`: host-mediated transports
//!
//! # Examples
//!
//! ```
//! use factcheck_llm::{DirectProvider, MockProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from the model!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from the model!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod assistant;
pub mod config;
pub mod dispatcher;
pub mod gemini;
pub mod host;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use assistant::{CannedAnswers, ChatAssistant, ChatBackend, FallbackRules, Reply, ReplySource};
pub use config::LlmConfig;
pub use dispatcher::{DispatchError, ProviderDispatcher, ProviderKind};
pub use gemini::GeminiProvider;
pub use host::{
    ChatHost, HostReply, HostRequest, HttpChatHost, MockHost, MockReply, ReplyChunk, ReplyShape,
};

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A provider answered with one round trip
#[async_trait]
pub trait DirectProvider: Send + Sync {
    /// Generate a reply for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<P: DirectProvider + ?Sized> DirectProvider for Arc<P> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

/// Mock provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use factcheck_llm::{DirectProvider, MockProvider};
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Option<String>>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(prompt.into(), Some(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(prompt.into(), None);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(|p| p.into_inner()) = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl DirectProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap_or_else(|p| p.into_inner()) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let configured = self
            .responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(prompt)
            .cloned();

        match configured {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo").await.unwrap(), "bar");
        assert_eq!(
            provider.generate("unknown").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("bad prompt").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_arc_dyn_provider() {
        let provider: Arc<dyn DirectProvider> = Arc::new(MockProvider::new("shared"));
        assert_eq!(provider.generate("x").await.unwrap(), "shared");
    }
}
