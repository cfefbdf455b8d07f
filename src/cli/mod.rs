//! CLI module for optgen
//!
//! Provides command-line interface for:
//! - describe: compile declarations and print the resulting schemas
//! - check: build and validate one option set

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, describe, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
