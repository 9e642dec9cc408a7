//! Triage error types
//!
//! Validation failures are per ticket and never abort a batch. Invariant
//! violations indicate a broken pipeline and are fatal for the run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for triage operations
pub type TriageResult<T> = Result<T, TriageError>;

/// A ticket record rejected at the input boundary.
///
/// Carries enough context to report the failure next to the offending ticket
/// without consulting the original record again.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("ticket {ticket_id}: invalid field `{field}`: {reason}")]
pub struct ValidationError {
    /// Id of the offending ticket, or `<unknown>` if the id itself is missing
    pub ticket_id: String,
    /// Name of the failing field
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        ticket_id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while running the triage pipeline
#[derive(Error, Debug)]
pub enum TriageError {
    /// A ticket failed boundary validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The expected-outcomes fixture and the ticket batch disagree
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A label could not be mapped onto its closed domain
    #[error("Unknown {domain} label: {label:?}")]
    UnknownLabel { domain: &'static str, label: String },

    /// An upstream stage broke a pipeline invariant
    #[error("Invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl TriageError {
    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an unknown-label error
    pub fn unknown_label(domain: &'static str, label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            domain,
            label: label.into(),
        }
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("SUP-9", "customer_revenue", "must be non-negative");
        assert_eq!(
            err.to_string(),
            "ticket SUP-9: invalid field `customer_revenue`: must be non-negative"
        );
    }

    #[test]
    fn test_fatality() {
        assert!(TriageError::invariant("missing record").is_fatal());
        assert!(!TriageError::unknown_label("tier", "Gold").is_fatal());

        let wrapped: TriageError = ValidationError::new("x", "id", "empty").into();
        assert!(!wrapped.is_fatal());
        assert!(matches!(wrapped, TriageError::Validation(_)));
    }
}
