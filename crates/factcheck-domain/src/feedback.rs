//! Feedback on a displayed verification result

use std::fmt;

/// Whether the user was satisfied with the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    /// Satisfied
    Positive,
    /// Not satisfied; carries a description of the issue
    Negative,
}

/// Feedback captured by a [`FeedbackCollector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Positive or negative
    pub kind: FeedbackKind,
    /// Free text (empty for positive feedback)
    pub text: String,
    /// Name of a file the user attached to negative feedback
    pub attachment: Option<String>,
}

/// Collector states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackState {
    /// Waiting for thumbs up / thumbs down
    AwaitingChoice,
    /// User was satisfied (terminal)
    PositiveThanked,
    /// Negative form is open
    NegativeFormOpen,
    /// Negative feedback submitted (terminal)
    NegativeReceived,
}

impl FeedbackState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedbackState::PositiveThanked | FeedbackState::NegativeReceived)
    }
}

impl fmt::Display for FeedbackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackState::AwaitingChoice => "awaiting choice",
            FeedbackState::PositiveThanked => "positive thanked",
            FeedbackState::NegativeFormOpen => "negative form open",
            FeedbackState::NegativeReceived => "negative received",
        };
        f.write_str(name)
    }
}

/// Errors from the feedback state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// The action is not allowed in the current state
    InvalidTransition {
        /// State the collector was in
        from: FeedbackState,
        /// Action that was attempted
        action: &'static str,
    },
    /// Negative feedback needs a description
    EmptyText,
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::InvalidTransition { from, action } => {
                write!(f, "cannot {} while {}", action, from)
            }
            FeedbackError::EmptyText => f.write_str("please describe the issue before submitting"),
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Linear state machine for result feedback
///
/// One collector is created per displayed result; once a terminal state is
/// reached it accepts nothing further.
#[derive(Debug, Clone)]
pub struct FeedbackCollector {
    state: FeedbackState,
    submitted: Option<Feedback>,
}

impl FeedbackCollector {
    /// Fresh collector awaiting a choice
    pub fn new() -> Self {
        Self {
            state: FeedbackState::AwaitingChoice,
            submitted: None,
        }
    }

    /// Current state
    pub fn state(&self) -> FeedbackState {
        self.state
    }

    /// Feedback captured so far, once terminal
    pub fn feedback(&self) -> Option<&Feedback> {
        self.submitted.as_ref()
    }

    /// Thumbs up: goes straight to the terminal thank-you state
    pub fn choose_positive(&mut self) -> Result<&Feedback, FeedbackError> {
        self.expect(FeedbackState::AwaitingChoice, "choose positive")?;
        self.state = FeedbackState::PositiveThanked;
        Ok(&*self.submitted.insert(Feedback {
            kind: FeedbackKind::Positive,
            text: String::new(),
            attachment: None,
        }))
    }

    /// Thumbs down: opens the negative feedback form
    pub fn choose_negative(&mut self) -> Result<(), FeedbackError> {
        self.expect(FeedbackState::AwaitingChoice, "choose negative")?;
        self.state = FeedbackState::NegativeFormOpen;
        Ok(())
    }

    /// Close the negative form without submitting
    pub fn cancel(&mut self) -> Result<(), FeedbackError> {
        self.expect(FeedbackState::NegativeFormOpen, "cancel")?;
        self.state = FeedbackState::AwaitingChoice;
        Ok(())
    }

    /// Submit the negative form; `text` must not be blank
    ///
    /// A blank description leaves the form open.
    pub fn submit_negative(
        &mut self,
        text: &str,
        attachment: Option<String>,
    ) -> Result<&Feedback, FeedbackError> {
        self.expect(FeedbackState::NegativeFormOpen, "submit negative feedback")?;
        if text.trim().is_empty() {
            return Err(FeedbackError::EmptyText);
        }
        self.state = FeedbackState::NegativeReceived;
        Ok(&*self.submitted.insert(Feedback {
            kind: FeedbackKind::Negative,
            text: text.trim().to_string(),
            attachment,
        }))
    }

    fn expect(&self, state: FeedbackState, action: &'static str) -> Result<(), FeedbackError> {
        if self.state == state {
            Ok(())
        } else {
            Err(FeedbackError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }
}

impl Default for FeedbackCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_path() {
        let mut collector = FeedbackCollector::new();
        let feedback = collector.choose_positive().unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Positive);
        assert_eq!(collector.state(), FeedbackState::PositiveThanked);
        assert!(collector.state().is_terminal());
    }

    #[test]
    fn test_negative_path_requires_text() {
        let mut collector = FeedbackCollector::new();
        collector.choose_negative().unwrap();

        assert_eq!(collector.submit_negative("   ", None), Err(FeedbackError::EmptyText));
        assert_eq!(collector.state(), FeedbackState::NegativeFormOpen);

        let feedback = collector
            .submit_negative("Sources are outdated", Some("screenshot.png".to_string()))
            .unwrap()
            .clone();
        assert_eq!(feedback.kind, FeedbackKind::Negative);
        assert_eq!(feedback.text, "Sources are outdated");
        assert_eq!(feedback.attachment.as_deref(), Some("screenshot.png"));
        assert_eq!(collector.state(), FeedbackState::NegativeReceived);
    }

    #[test]
    fn test_cancel_returns_to_choice() {
        let mut collector = FeedbackCollector::new();
        collector.choose_negative().unwrap();
        collector.cancel().unwrap();
        assert_eq!(collector.state(), FeedbackState::AwaitingChoice);
        collector.choose_positive().unwrap();
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut collector = FeedbackCollector::new();
        collector.choose_positive().unwrap();

        assert!(collector.choose_positive().is_err());
        assert!(collector.choose_negative().is_err());
        assert!(collector.cancel().is_err());
        assert!(collector.submit_negative("text", None).is_err());
        assert_eq!(collector.state(), FeedbackState::PositiveThanked);
    }

    #[test]
    fn test_submit_without_form_is_invalid() {
        let mut collector = FeedbackCollector::new();
        let err = collector.submit_negative("text", None).unwrap_err();
        assert!(matches!(err, FeedbackError::InvalidTransition { from: FeedbackState::AwaitingChoice, .. }));
    }
}
