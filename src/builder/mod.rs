//! Builder subsystem
//!
//! Setters are plain `{field, value}` commands applied in list order; the
//! last setter for a field wins. Finalizing consumes the builder and yields
//! either a sealed [`Configuration`] or every field error at once.

mod configuration;
mod errors;
mod options_builder;
mod setter;

pub use configuration::Configuration;
pub use errors::{SetterError, SetterResult};
pub use options_builder::Builder;
pub use setter::{PendingField, Setter};
