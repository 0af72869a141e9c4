//! FactCheck Domain Layer
//!
//! This crate contains the core model for the FactCheck client. It depends
//! only on `serde` (for the shapes that travel as JSON) and `uuid`, and
//! defines the value objects, pure renderers, state machines and trait
//! interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Claim draft**: what the user is editing before submission
//! - **Verification result**: score, explanation and evidence for a claim
//! - **Trust score**: integer 0–100, rendered through one five-band scheme
//! - **Feedback**: a small state machine attached to each displayed result
//! - **Catalogue**: previously checked claims and their verdicts
//!
//! ## Architecture
//!
//! - Pure logic only; no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod claim;
pub mod feedback;
pub mod result;
pub mod traits;
pub mod trust_score;
pub mod validation;

// Re-exports for convenience
pub use catalog::{ClaimFilter, ClaimRecord, RecordId, SourceRef, Verdict};
pub use claim::{
    Attachment, AttachmentId, AttachmentSummary, ClaimDraft, MediaType, MAX_DESCRIPTION_CHARS,
    MAX_TITLE_CHARS,
};
pub use feedback::{Feedback, FeedbackCollector, FeedbackError, FeedbackKind, FeedbackState};
pub use result::{clamp_score, Evidence, VerificationPayload, VerificationResult, DEFAULT_SCORE};
pub use traits::SlotStorage;
pub use trust_score::{RingGeometry, TrustBand, TrustScoreDescriptor, TrustScoreRenderer};
pub use validation::{FieldError, ValidationReport};
