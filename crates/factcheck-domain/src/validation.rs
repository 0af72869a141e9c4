//! Field-level validation results
//!
//! Forms are validated as a whole: every failing field contributes one
//! [`FieldError`] and the caller decides which of them block.

use std::fmt;

/// A problem with one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as shown to the user (e.g. "title", "sources[1]")
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Whether no field failed
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors, in the order they were found
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First error for `field`, if any
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Whether `field` has an error
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&joined.join("; "))
    }
}
