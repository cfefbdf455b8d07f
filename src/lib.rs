//! optgen - a declarative options compiler
//!
//! A schema of named fields, each mandatory, defaulted or optional and
//! carrying validation rules, yields a builder that accepts an ordered
//! sequence of setters and a validator that turns the builder into either a
//! sealed configuration or the complete list of field errors.

pub mod builder;
pub mod cli;
pub mod observability;
pub mod schema;
pub mod typed;
pub mod validate;

pub use builder::{Builder, Configuration, Setter, SetterError};
pub use schema::{FieldDecl, OptionsSchema, SchemaDecl, SchemaError, SchemaRegistry, TypeTag, Value};
pub use typed::{Compiled, OptionValue, OptionsError, TypedOptions};
pub use validate::{FieldError, ValidationErrors, ValidationOutcome, Validator};
