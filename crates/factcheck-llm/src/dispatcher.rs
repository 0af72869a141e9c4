//! Provider dispatch
//!
//! [`ProviderDispatcher`] routes a chat message to the currently selected
//! provider and normalizes whatever comes back into a plain `String`.

use crate::config::{LlmConfig, DEFAULT_GPT_MODEL, DEFAULT_GROK_MODEL};
use crate::gemini::GeminiProvider;
use crate::host::{ChatHost, HostRequest, HttpChatHost, ReplyShape};
use crate::{DirectProvider, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, error, info};

/// Selectable AI provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Gemini, called directly
    #[default]
    Gemini,
    /// GPT via the chat host
    Gpt,
    /// Grok via the chat host
    Grok,
}

impl ProviderKind {
    /// All providers in toggle order
    pub const ALL: [ProviderKind; 3] = [ProviderKind::Gemini, ProviderKind::Gpt, ProviderKind::Grok];

    /// The provider after this one in the cycle
    pub fn next(self) -> Self {
        match self {
            ProviderKind::Gemini => ProviderKind::Gpt,
            ProviderKind::Gpt => ProviderKind::Grok,
            ProviderKind::Grok => ProviderKind::Gemini,
        }
    }

    /// Lowercase identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Gpt => "gpt",
            ProviderKind::Grok => "grok",
        }
    }

    /// Whether calls go through the chat host
    pub fn is_hosted(self) -> bool {
        !matches!(self, ProviderKind::Gemini)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Gpt => "GPT",
            ProviderKind::Grok => "Grok",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}

/// Uniform failure from any provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to get response from {provider}: {message}")]
pub struct DispatchError {
    /// Provider the call was made to
    pub provider: ProviderKind,

    /// Provider-level error text
    pub message: String,
}

/// Routes messages to the selected provider
///
/// The provider is read once at the start of each call, so toggling while a
/// call is in flight only affects later calls.
pub struct ProviderDispatcher {
    direct: Arc<dyn DirectProvider>,
    host: Arc<dyn ChatHost>,
    gpt_model: String,
    grok_model: String,
    system_prompt: Option<String>,
    current: Mutex<ProviderKind>,
    last_error: Mutex<Option<String>>,
}

impl ProviderDispatcher {
    /// Create a dispatcher over a direct provider and a chat host
    pub fn new(direct: Arc<dyn DirectProvider>, host: Arc<dyn ChatHost>) -> Self {
        Self {
            direct,
            host,
            gpt_model: DEFAULT_GPT_MODEL.to_string(),
            grok_model: DEFAULT_GROK_MODEL.to_string(),
            system_prompt: None,
            current: Mutex::new(ProviderKind::default()),
            last_error: Mutex::new(None),
        }
    }

    /// Build the real providers from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let mut gemini = GeminiProvider::new(
            &config.gemini_endpoint,
            &config.gemini_api_key,
            &config.gemini_model,
        )
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries);
        if !config.system_prompt.is_empty() {
            gemini = gemini.with_system_instruction(&config.system_prompt);
        }
        let host = HttpChatHost::with_timeout(&config.host_endpoint, config.timeout());

        let mut dispatcher = Self::new(Arc::new(gemini), Arc::new(host))
            .with_models(&config.gpt_model, &config.grok_model);
        if !config.system_prompt.is_empty() {
            dispatcher = dispatcher.with_system_prompt(&config.system_prompt);
        }
        Ok(dispatcher)
    }

    /// Set the host model ids for GPT and Grok
    pub fn with_models(mut self, gpt: impl Into<String>, grok: impl Into<String>) -> Self {
        self.gpt_model = gpt.into();
        self.grok_model = grok.into();
        self
    }

    /// Set the system prompt sent to hosted models
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Provider used by the next call
    pub fn current_provider(&self) -> ProviderKind {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Select a provider explicitly
    pub fn set_provider(&self, kind: ProviderKind) {
        *self.current.lock().unwrap_or_else(|p| p.into_inner()) = kind;
    }

    /// Advance to the next provider (Gemini → GPT → Grok → Gemini)
    pub fn toggle_provider(&self) -> ProviderKind {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        let next = current.next();
        *current = next;
        info!(provider = %next, "Switched AI provider");
        next
    }

    /// Error text of the most recent failed call, cleared when a call starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_last_error(&self, value: Option<String>) {
        *self.last_error.lock().unwrap_or_else(|p| p.into_inner()) = value;
    }

    /// Send a message to the current provider
    pub async fn send_message(&self, text: &str) -> Result<String, DispatchError> {
        let provider = self.current_provider();
        self.set_last_error(None);

        let outcome = match provider {
            ProviderKind::Gemini => self.direct.generate(text).await,
            ProviderKind::Gpt => self.send_hosted(&self.gpt_model, text).await,
            ProviderKind::Grok => self.send_hosted(&self.grok_model, text).await,
        };

        match outcome {
            Ok(reply) => {
                debug!(provider = %provider, len = reply.len(), "Provider replied");
                Ok(reply)
            }
            Err(e) => {
                error!(provider = %provider, error = %e, "Provider call failed");
                let message = e.to_string();
                self.set_last_error(Some(message.clone()));
                Err(DispatchError { provider, message })
            }
        }
    }

    async fn send_hosted(&self, model: &str, text: &str) -> Result<String, LlmError> {
        let request = HostRequest {
            message: text.to_string(),
            model: model.to_string(),
            system: self.system_prompt.clone(),
            stream: true,
        };
        let shape = ReplyShape::classify(self.host.chat(request).await?);
        debug!(model, shape = shape.kind(), "Classified host reply");
        shape.into_text().await
    }
}
