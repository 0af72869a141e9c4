//! Error types for the CLI application.

use factcheck_client::ClientError;
use factcheck_domain::FeedbackError;
use factcheck_llm::LlmError;
use factcheck_store::StoreError;
use factcheck_submit::{StageError, SubmissionError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend client error
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Claim submission error
    #[error("{0}")]
    Submission(#[from] SubmissionError),

    /// Attachment staging error
    #[error("{0}")]
    Stage(#[from] StageError),

    /// Local storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// AI provider setup error
    #[error("AI provider error: {0}")]
    Llm(#[from] LlmError),

    /// Feedback form error
    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Line editor error
    #[error("Line editor error: {0}")]
    Readline(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing stored yet
    #[error("No verification result stored. Use 'submit' first.")]
    NoResult,

    /// Command needs a logged-in user
    #[error("Not logged in. Use 'login' first.")]
    NotLoggedIn,
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::Readline(e.to_string())
    }
}
