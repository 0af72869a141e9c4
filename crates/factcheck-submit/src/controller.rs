//! Submission state machine
//!
//! ```text
//! Editing → Validating → Submitting → Success
//!              │              └──────→ Failure → Editing
//!              └─ title error ───────────────────→ Editing
//! ```

use crate::error::SubmissionError;
use crate::service::{VerificationRequest, VerificationService};
use crate::validation::{is_blocking, validate_draft};
use factcheck_domain::traits::SlotStorage;
use factcheck_domain::{ClaimDraft, ValidationReport, VerificationResult};
use factcheck_store::VerificationResultStore;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the submission form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionState {
    /// User is editing the draft
    #[default]
    Editing,
    /// Draft is being validated
    Validating,
    /// Verification call in flight
    Submitting,
    /// Result stored
    Success,
    /// Verification failed; returns to editing
    Failure,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionState::Editing => "editing",
            SubmissionState::Validating => "validating",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Success => "success",
            SubmissionState::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// Which view the front end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// The submission form
    #[default]
    Form,
    /// The stored result
    Result,
}

/// Drives one claim form from draft to stored result
pub struct SubmissionController<V, S> {
    service: Arc<V>,
    store: VerificationResultStore<S>,
    state: Mutex<SubmissionState>,
    report: Mutex<ValidationReport>,
    latest: AtomicU64,
    view: watch::Sender<View>,
}

impl<V, S> SubmissionController<V, S>
where
    V: VerificationService,
    S: SlotStorage,
    S::Error: Display,
{
    /// Create a controller writing results into `store`
    pub fn new(service: V, store: VerificationResultStore<S>) -> Self {
        Self::with_shared_service(Arc::new(service), store)
    }

    /// Create a controller over a service shared with other components
    pub fn with_shared_service(service: Arc<V>, store: VerificationResultStore<S>) -> Self {
        let (view, _) = watch::channel(View::Form);
        Self {
            service,
            store,
            state: Mutex::new(SubmissionState::Editing),
            report: Mutex::new(ValidationReport::new()),
            latest: AtomicU64::new(0),
            view,
        }
    }

    /// Current state
    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Field errors from the last validation, blocking or not
    pub fn last_report(&self) -> ValidationReport {
        self.report.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Result store the controller writes to
    pub fn store(&self) -> &VerificationResultStore<S> {
        &self.store
    }

    /// Navigation signal; flips to [`View::Result`] after a success
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    /// Go back to the form for a new claim
    pub fn reset(&self) {
        self.transition(SubmissionState::Editing);
        self.view.send_replace(View::Form);
    }

    fn transition(&self, to: SubmissionState) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        let from = *state;
        debug!(%from, %to, "Submission state change");
        *state = to;
    }

    fn is_latest(&self, id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == id
    }

    /// Validate the draft, verify it, and store the result
    ///
    /// Responses for a submission that has since been replaced by a newer
    /// one are dropped with [`SubmissionError::Superseded`].
    pub async fn submit(&self, draft: &ClaimDraft) -> Result<VerificationResult, SubmissionError> {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        self.transition(SubmissionState::Validating);
        let report = validate_draft(draft);
        *self.report.lock().unwrap_or_else(|p| p.into_inner()) = report.clone();

        if is_blocking(&report) {
            info!(submission = id, "Draft rejected: {}", report);
            self.transition(SubmissionState::Editing);
            return Err(SubmissionError::Validation(report));
        }
        if !report.is_ok() {
            warn!(submission = id, "Submitting despite field errors: {}", report);
        }

        let request = VerificationRequest::from_draft(draft);
        self.transition(SubmissionState::Submitting);
        info!(
            submission = id,
            sources = request.sources.len(),
            attachments = request.attachments.len(),
            "Submitting claim"
        );

        let outcome = self.service.verify(&request).await;

        if !self.is_latest(id) {
            warn!(submission = id, "Discarding response for superseded submission");
            return Err(SubmissionError::Superseded(id));
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(submission = id, "Verification failed: {}", e);
                self.fail();
                return Err(SubmissionError::Transport(e.to_string()));
            }
        };

        if let Err(e) = self.store.write(&result) {
            warn!(submission = id, "Failed to store result: {}", e);
            self.fail();
            return Err(e.into());
        }

        self.transition(SubmissionState::Success);
        self.view.send_replace(View::Result);
        info!(submission = id, score = result.score, "Claim verified");
        Ok(result)
    }

    fn fail(&self) {
        self.transition(SubmissionState::Failure);
        self.transition(SubmissionState::Editing);
    }
}
