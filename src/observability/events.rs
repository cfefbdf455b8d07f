//! Observable events for optgen
//!
//! Events are explicit and typed. Each one is emitted through `tracing`
//! with its code in the `event` field.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema registry
    /// Schema compiled and registered
    SchemaRegistered,
    /// Schema declaration rejected as defective (FATAL)
    SchemaRejected,
    /// Declaration sources loaded from disk
    SchemasLoaded,

    // Builder
    /// Setter rejected at the call boundary
    SetterRejected,
    /// Default literal applied to an unset field
    DefaultApplied,

    // Validation
    /// Builder finalized into a sealed configuration
    BuildFinalized,
    /// Finalize produced field errors
    ValidationFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SetterRejected => "SETTER_REJECTED",
            Event::DefaultApplied => "DEFAULT_APPLIED",
            Event::BuildFinalized => "BUILD_FINALIZED",
            Event::ValidationFailed => "VALIDATION_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SchemaRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
