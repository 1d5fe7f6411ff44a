//! Domain errors for the projection service.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// An invariant of a domain object was violated.
    InvariantViolation {
        /// Invariant that was violated.
        invariant: String,
        /// Description of the offending state.
        message: String,
    },
}

impl DomainError {
    /// Shorthand for an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an `InvariantViolation` error.
    #[must_use]
    pub fn invariant(invariant: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            invariant: invariant.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::InvariantViolation { invariant, message } => {
                write!(f, "Invariant '{invariant}' violated: {message}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::invalid_value("paths", "must be at least 1");
        let msg = format!("{err}");
        assert!(msg.contains("paths"));
        assert!(msg.contains("at least 1"));
    }

    #[test]
    fn invariant_display() {
        let err = DomainError::invariant("chronological", "2024-01-03 follows 2024-01-04");
        assert_eq!(
            err.to_string(),
            "Invariant 'chronological' violated: 2024-01-03 follows 2024-01-04"
        );
    }

    #[test]
    fn domain_error_is_std_error() {
        let err = DomainError::invalid_value("drift", "not finite");
        let _: &dyn std::error::Error = &err;
    }
}
