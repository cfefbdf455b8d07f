//! Setter rejection errors
//!
//! A setter is checked at the builder's entry point. A rejected setter
//! leaves every pending field untouched.
//!
//! Error codes:
//! - OPT_SETTER_UNKNOWN_FIELD (REJECT)
//! - OPT_SETTER_TYPE_MISMATCH (REJECT)
//! - OPT_SETTER_INVALID_LITERAL (REJECT)

use thiserror::Error;

use crate::schema::{Severity, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetterError {
    /// Setter targets a field the schema does not declare
    #[error("schema '{schema}' has no field '{field}'")]
    UnknownField { schema: String, field: String },

    /// Setter value does not match the field type
    #[error("field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// Textual value does not parse as the field type
    #[error("field '{field}': {reason}")]
    InvalidLiteral { field: String, reason: String },
}

impl SetterError {
    pub fn code(&self) -> &'static str {
        match self {
            SetterError::UnknownField { .. } => "OPT_SETTER_UNKNOWN_FIELD",
            SetterError::TypeMismatch { .. } => "OPT_SETTER_TYPE_MISMATCH",
            SetterError::InvalidLiteral { .. } => "OPT_SETTER_INVALID_LITERAL",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    pub fn field(&self) -> &str {
        match self {
            SetterError::UnknownField { field, .. }
            | SetterError::TypeMismatch { field, .. }
            | SetterError::InvalidLiteral { field, .. } => field,
        }
    }
}

/// Result type for setter application
pub type SetterResult<T> = Result<T, SetterError>;
