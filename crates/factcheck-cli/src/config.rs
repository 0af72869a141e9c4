//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use factcheck_client::DEFAULT_API_URL;
use factcheck_llm::LlmConfig;
use factcheck_submit::StagerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend URL
pub const API_URL_ENV: &str = "FACTCHECK_API_URL";

/// Environment variable carrying the Gemini API key
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

const DIR_NAME: &str = ".factcheck";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the slot database and history live; `~/.factcheck` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// AI provider settings
    #[serde(default)]
    pub ai: LlmConfig,

    /// Attachment staging limits
    #[serde(default)]
    pub staging: StagerConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Chat history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DIR_NAME))
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(home_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `FACTCHECK_API_URL` and `GEMINI_API_KEY` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(key) = lookup(GEMINI_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.ai.gemini_api_key = key;
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(CliError::Config("api_url must not be empty".into()));
        }
        self.ai
            .validate()
            .map_err(|e| CliError::Config(format!("[ai] {}", e)))?;
        self.staging
            .validate()
            .map_err(|e| CliError::Config(format!("[staging] {}", e)))?;
        Ok(())
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => home_dir(),
        }
    }

    /// Slot database file.
    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("factcheck.db"))
    }

    /// Chat history file.
    pub fn history_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("history.txt"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: None,
            settings: Settings::default(),
            ai: LlmConfig::default(),
            staging: StagerConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}
