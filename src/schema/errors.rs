//! Schema defect types
//!
//! A schema defect is an authoring bug in a field declaration. It is raised
//! when the schema is loaded, never while a builder is being finalized.
//!
//! Error codes:
//! - OPT_SCHEMA_MANDATORY_WITH_DEFAULT (FATAL)
//! - OPT_SCHEMA_CONFLICTING_PRESENCE (FATAL)
//! - OPT_SCHEMA_IMPLICIT_ZERO_VALUE (FATAL)
//! - OPT_SCHEMA_UNKNOWN_RULE (FATAL)
//! - OPT_SCHEMA_INVALID_RULE_PARAM (FATAL)
//! - OPT_SCHEMA_RULE_NOT_APPLICABLE (FATAL)
//! - OPT_SCHEMA_MALFORMED_DEFAULT (FATAL)
//! - OPT_SCHEMA_DUPLICATE_FIELD (FATAL)
//! - OPT_SCHEMA_DUPLICATE_SCHEMA (FATAL)
//! - OPT_SCHEMA_MALFORMED (FATAL)

use std::fmt;

use thiserror::Error;

use super::types::TypeTag;

/// Severity levels shared by every error family in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The offending input is rejected, the caller may retry with other input
    Reject,
    /// A programming or authoring bug, not recoverable by the caller
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Defects detected while compiling field declarations into a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Mandatory and default are mutually exclusive
    #[error("field '{field}' is mandatory and also declares default '{default}'")]
    MandatoryWithDefault { field: String, default: String },

    /// Optional is combined with mandatory or default
    #[error("field '{field}' is declared optional together with mandatory or default")]
    ConflictingPresence { field: String },

    /// Field is neither mandatory, defaulted, nor explicitly optional
    #[error("field '{field}' must be mandatory, carry a default, or be declared optional")]
    ImplicitZeroValue { field: String },

    /// Rule name outside the closed grammar
    #[error("field '{field}': unknown rule '{rule}'")]
    UnknownRule { field: String, rule: String },

    /// Rule parameter missing, unexpected or unparsable
    #[error("field '{field}': rule '{rule}' {reason}")]
    InvalidRuleParam {
        field: String,
        rule: String,
        reason: String,
    },

    /// Rule cannot be evaluated against the field's type
    #[error("field '{field}': rule '{rule}' does not apply to {kind} fields")]
    RuleNotApplicable {
        field: String,
        rule: String,
        kind: TypeTag,
    },

    /// Default literal does not parse as the field's type
    #[error("field '{field}': default '{literal}' is not a valid {kind}: {reason}")]
    MalformedDefault {
        field: String,
        literal: String,
        kind: TypeTag,
        reason: String,
    },

    /// Two fields share a name within one schema
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    /// A schema name is registered twice
    #[error("schema '{schema}' is already registered")]
    DuplicateSchema { schema: String },

    /// Declaration source could not be read or decoded
    #[error("malformed schema source '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::MandatoryWithDefault { .. } => "OPT_SCHEMA_MANDATORY_WITH_DEFAULT",
            SchemaError::ConflictingPresence { .. } => "OPT_SCHEMA_CONFLICTING_PRESENCE",
            SchemaError::ImplicitZeroValue { .. } => "OPT_SCHEMA_IMPLICIT_ZERO_VALUE",
            SchemaError::UnknownRule { .. } => "OPT_SCHEMA_UNKNOWN_RULE",
            SchemaError::InvalidRuleParam { .. } => "OPT_SCHEMA_INVALID_RULE_PARAM",
            SchemaError::RuleNotApplicable { .. } => "OPT_SCHEMA_RULE_NOT_APPLICABLE",
            SchemaError::MalformedDefault { .. } => "OPT_SCHEMA_MALFORMED_DEFAULT",
            SchemaError::DuplicateField { .. } => "OPT_SCHEMA_DUPLICATE_FIELD",
            SchemaError::DuplicateSchema { .. } => "OPT_SCHEMA_DUPLICATE_SCHEMA",
            SchemaError::Malformed { .. } => "OPT_SCHEMA_MALFORMED",
        }
    }

    /// Schema defects are always fatal
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub(crate) fn invalid_param(
        field: &str,
        rule: &str,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidRuleParam {
            field: field.to_string(),
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
