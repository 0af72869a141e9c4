//! Error types for the FactCheck client.

use factcheck_domain::ValidationReport;
use factcheck_store::StoreError;
use thiserror::Error;

/// Client operation errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error (network, DNS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Error text from the body, or the status reason
        message: String,
    },

    /// Credentials or token rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend refused the request (`success: false`)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Form input failed validation
    #[error("Invalid input: {0}")]
    Invalid(ValidationReport),

    /// Token storage failed
    #[error("Token storage error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Whether the backend rejected the caller's credentials
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Auth(_) | ClientError::Http { status: 401 | 403, .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ClientError::Connection(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) => ClientError::Http {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => ClientError::Connection(e.to_string()),
            }
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(format!("JSON parsing error: {}", e))
    }
}
