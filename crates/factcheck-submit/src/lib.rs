//! FactCheck Claim Submission
//!
//! Takes a claim draft from the form to a stored verification result.
//!
//! # Architecture
//!
//! ```text
//! ClaimDraft → validate → AttachmentStager → VerificationService → VerificationResultStore
//!                                                                  └→ View::Result
//! ```
//!
//! - [`validate_draft`] checks every field; only the title blocks
//! - [`AttachmentStager`] filters, limits and reads image attachments
//! - [`SubmissionController`] runs the state machine and drops stale responses
//! - [`VerificationService`] is implemented for the backend client and for
//!   [`MockVerifier`]
//!
//! # Example Usage
//!
//! ```no_run
//! use factcheck_client::FactCheckClient;
//! use factcheck_domain::ClaimDraft;
//! use factcheck_store::{MemorySlots, VerificationResultStore};
//! use factcheck_submit::SubmissionController;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FactCheckClient::new("http://localhost:5000/api");
//! let store = VerificationResultStore::new(MemorySlots::new());
//! let controller = SubmissionController::new(client, store);
//!
//! let result = controller.submit(&ClaimDraft::new("Vaccines cause flu")).await?;
//! println!("score: {}", result.score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod service;
mod stager;
pub mod validation;

pub use config::StagerConfig;
pub use controller::{SubmissionController, SubmissionState, View};
pub use error::{StageError, SubmissionError};
pub use service::{MockVerifier, VerificationRequest, VerificationService};
pub use stager::{data_uri, mime_from_path, AttachmentStager, EntryPoint, FileContent, PickedFile};
pub use validation::{parse_media_type, validate_draft};
