//! Configuration for the AI providers

use crate::gemini::{DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default chat host endpoint
pub const DEFAULT_HOST_ENDPOINT: &str = "http://localhost:8787";

/// Default host model for the GPT provider
pub const DEFAULT_GPT_MODEL: &str = "gpt-4o";

/// Default host model for the Grok provider
pub const DEFAULT_GROK_MODEL: &str = "x-ai/grok-3-beta";

/// Default system prompt sent to hosted models
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a fact-checking assistant. Answer clearly and accurately, and say so when a claim cannot be verified.";

/// Configuration for the provider dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini API base URL
    pub gemini_endpoint: String,

    /// Gemini model id
    pub gemini_model: String,

    /// Gemini API key (empty when unset)
    pub gemini_api_key: String,

    /// Chat host base URL for GPT and Grok
    pub host_endpoint: String,

    /// Host model id used for GPT
    pub gpt_model: String,

    /// Host model id used for Grok
    pub grok_model: String,

    /// System prompt for every provider
    pub system_prompt: String,

    /// Timeout for a single provider call (seconds)
    pub timeout_secs: u64,

    /// Attempts per Gemini call
    pub max_retries: u32,
}

impl LlmConfig {
    /// Get the provider timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.gemini_endpoint.trim().is_empty() {
            return Err("gemini_endpoint must not be empty".to_string());
        }
        if self.gemini_model.trim().is_empty() {
            return Err("gemini_model must not be empty".to_string());
        }
        if self.host_endpoint.trim().is_empty() {
            return Err("host_endpoint must not be empty".to_string());
        }
        if self.gpt_model.trim().is_empty() || self.grok_model.trim().is_empty() {
            return Err("gpt_model and grok_model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_endpoint: crate::gemini::DEFAULT_ENDPOINT.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_key: String::new(),
            host_endpoint: DEFAULT_HOST_ENDPOINT.to_string(),
            gpt_model: DEFAULT_GPT_MODEL.to_string(),
            grok_model: DEFAULT_GROK_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
