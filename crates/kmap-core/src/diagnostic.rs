//! Diagnostics reported back to the host.
//!
//! Every problem found in a pair becomes one [`Diagnostic`], localized to the
//! directive (property) or the pair that caused it. Every diagnostic is an
//! error: a pair either generates cleanly or not at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::types::Location;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// A directive, identified by its owning type and property name.
    Property { owner: String, name: String },
    /// A whole pair, identified by its source type.
    Pair { source: String },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Property { owner, name } => write!(f, "{}.{}", owner, name),
            Subject::Pair { source } => write!(f, "{}", source),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code, e.g. `unresolved_member`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    pub subject: Subject,
    /// Host source location of the subject, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// An error diagnostic for a mapping error.
    pub fn error(err: &MappingError, subject: Subject, location: Option<Location>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: err.code().to_string(),
            message: err.to_string(),
            subject,
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}: {}: {}", loc, self.severity, self.message),
            None => write!(f, "{}: {}: {}", self.subject, self.severity, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_carries_code_and_message() {
        let diag = Diagnostic::error(
            &MappingError::MissingPackageName,
            Subject::Pair {
                source: "a.Source".to_string(),
            },
            None,
        );
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, "missing_package_name");
        assert_eq!(
            diag.to_string(),
            "a.Source: error: MapPartner doesn't contain parameter packageName."
        );
    }

    #[test]
    fn display_prefers_location() {
        let diag = Diagnostic::error(
            &MappingError::MissingPackageName,
            Subject::Pair {
                source: "a.Source".to_string(),
            },
            Some(Location::new("a/Source.kt", 5, 1)),
        );
        assert!(diag.to_string().starts_with("a/Source.kt:5:1: error: "));
    }

    #[test]
    fn serializes_subject_kind() {
        let diag = Diagnostic::error(
            &MappingError::MissingPackageName,
            Subject::Property {
                owner: "a.Scalar".to_string(),
                name: "x".to_string(),
            },
            None,
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"code\":\"missing_package_name\""));
        assert!(json.contains("\"kind\":\"property\""));
        assert!(!json.contains("\"location\""));
    }
}
