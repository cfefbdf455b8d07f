//! Validation subsystem
//!
//! Runs at finalize time only. Components run in a fixed order:
//!
//! 1. defaults: unset non-mandatory fields receive their default or zero value
//! 2. mandatory: unset mandatory fields yield `Required` errors
//! 3. evaluator: every rule of every populated field runs
//!
//! All errors are aggregated; the outcome is either a sealed configuration
//! or the complete error list.

mod defaults;
mod errors;
mod evaluator;
mod mandatory;
mod validator;

pub use defaults::apply_defaults;
pub use errors::{FieldError, ValidationErrors};
pub use evaluator::{check, evaluate};
pub use mandatory::enforce_mandatory;
pub use validator::{ValidationOutcome, Validator};
