//! Custom error types for change-audit
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for change-audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Misconfigured auditing: unknown event names, events outside the
    /// entity's auditable set, or asking for audit data with no event set
    #[error("Auditing error: {0}")]
    Configuration(String),

    /// The audit store failed to create or read records
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Settings file errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// Lookup errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A short identifier matched more than one entry
    #[error("Ambiguous {entity_type} id {identifier}: matches {matches} records")]
    Ambiguous {
        entity_type: &'static str,
        identifier: String,
        matches: usize,
    },
}

impl AuditError {
    /// Create a "not found" error for audit records
    pub fn audit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Audit",
            identifier: identifier.into(),
        }
    }

    /// Create an "ambiguous id" error for audit records
    pub fn audit_ambiguous(identifier: impl Into<String>, matches: usize) -> Self {
        Self::Ambiguous {
            entity_type: "Audit",
            identifier: identifier.into(),
            matches,
        }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for change-audit operations
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuditError::Configuration("A valid audit event has not been set".into());
        assert_eq!(
            err.to_string(),
            "Auditing error: A valid audit event has not been set"
        );
        assert!(err.is_configuration());
        assert!(!err.is_persistence());
    }

    #[test]
    fn test_not_found_error() {
        let err = AuditError::audit_not_found("aud-1234abcd");
        assert_eq!(err.to_string(), "Audit not found: aud-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let audit_err: AuditError = io_err.into();
        assert!(matches!(audit_err, AuditError::Io(_)));
    }

    #[test]
    fn test_ambiguous_error() {
        let err = AuditError::audit_ambiguous("aud-1234abcd", 2);
        assert!(err.is_ambiguous());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Ambiguous Audit id aud-1234abcd: matches 2 records"
        );
    }
}
