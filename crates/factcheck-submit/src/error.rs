//! Error types for claim submission

use factcheck_domain::ValidationReport;
use factcheck_store::StoreError;
use thiserror::Error;

/// Errors that can occur while submitting a claim
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// The title failed validation; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    /// The verification call failed
    #[error("Verification failed: {0}")]
    Transport(String),

    /// A newer submission started while this one was in flight
    #[error("Submission {0} was superseded by a newer one")]
    Superseded(u64),

    /// The result could not be stored
    #[error("Failed to store result: {0}")]
    Persistence(#[from] StoreError),
}

/// Errors that can occur while staging attachments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The batch would exceed the attachment limit
    #[error("Maximum {max} images allowed ({current} already attached, {requested} more requested)")]
    TooManyAttachments {
        /// Attachments committed or being read
        current: usize,
        /// Accepted files in the rejected batch
        requested: usize,
        /// Configured limit
        max: usize,
    },

    /// A picked file could not be inspected
    #[error("Cannot read {name}: {message}")]
    Read {
        /// File name or path
        name: String,
        /// Underlying error
        message: String,
    },
}
