//! Configuration for attachment staging

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the [`AttachmentStager`](crate::AttachmentStager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagerConfig {
    /// Maximum attachments per draft, pending reads included
    pub max_attachments: usize,

    /// Largest accepted file (bytes)
    pub max_file_bytes: u64,

    /// Interval between cosmetic progress updates (milliseconds)
    pub progress_tick_ms: u64,

    /// Percentage added on each progress tick
    pub progress_step: u8,

    /// Simulated upload time after a file has been read (milliseconds)
    pub commit_delay_ms: u64,
}

impl StagerConfig {
    /// Progress tick as a Duration
    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    /// Commit delay as a Duration
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attachments == 0 {
            return Err("max_attachments must be greater than 0".to_string());
        }
        if self.max_file_bytes == 0 {
            return Err("max_file_bytes must be greater than 0".to_string());
        }
        if self.progress_tick_ms == 0 {
            return Err("progress_tick_ms must be greater than 0".to_string());
        }
        if self.progress_step == 0 || self.progress_step > 100 {
            return Err("progress_step must be between 1 and 100".to_string());
        }
        Ok(())
    }

    /// Preset without simulated delays, for tests and scripted use
    pub fn instant() -> Self {
        Self {
            progress_tick_ms: 1,
            commit_delay_ms: 0,
            ..Self::default()
        }
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

impl Default for StagerConfig {
    fn default() -> Self {
        Self {
            max_attachments: 3,
            max_file_bytes: 5 * 1024 * 1024,
            progress_tick_ms: 100,
            progress_step: 10,
            commit_delay_ms: 1000,
        }
    }
}
