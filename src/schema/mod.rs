//! Field schema subsystem
//!
//! Schemas describe every configurable field: its type, how it is populated
//! when no setter touches it, and the rules its final value must satisfy.
//!
//! # Design Principles
//!
//! - Declarations are compiled once, at load time
//! - Mandatory and default are mutually exclusive
//! - No implicit zero values: a field is mandatory, defaulted, or declared optional
//! - Authoring defects are fatal and never surface as validation errors

mod declaration;
mod errors;
pub mod literal;
mod loader;
mod rules;
mod types;

pub use declaration::{FieldDecl, SchemaDecl};
pub use errors::{SchemaError, SchemaResult, Severity};
pub use loader::SchemaRegistry;
pub use rules::{parse_rules, RuleKind, RuleSpec};
pub(crate) use rules::Constraint;
pub use types::{FieldSchema, OptionsSchema, Presence, TypeTag, Value};
