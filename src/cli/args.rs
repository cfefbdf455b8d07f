//! CLI argument definitions using clap
//!
//! Commands:
//! - optgen describe --schema <path> [--name <schema>]
//! - optgen check --schema <path> --name <schema> [--values <file>] [--set field=value]...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// optgen - compile option schemas and validate option sets
#[derive(Parser, Debug)]
#[command(name = "optgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile schema declarations and print them as JSON
    Describe {
        /// Declaration file, or directory of *.json declarations
        #[arg(long)]
        schema: PathBuf,

        /// Only print this schema
        #[arg(long)]
        name: Option<String>,
    },

    /// Build and validate one option set against a schema
    Check {
        /// Declaration file, or directory of *.json declarations
        #[arg(long)]
        schema: PathBuf,

        /// Schema to build
        #[arg(long)]
        name: String,

        /// JSON object of field values, applied before any --set
        #[arg(long)]
        values: Option<PathBuf>,

        /// Field assignment, applied in order; repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_keeps_set_order() {
        let cli = Cli::try_parse_from([
            "optgen",
            "check",
            "--schema",
            "schemas",
            "--name",
            "ServiceOptions",
            "--set",
            "retries=1",
            "--set",
            "retries=2",
        ])
        .unwrap();

        match cli.command {
            Command::Check { name, set, values, .. } => {
                assert_eq!(name, "ServiceOptions");
                assert_eq!(set, vec!["retries=1", "retries=2"]);
                assert!(values.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_check_requires_name() {
        assert!(Cli::try_parse_from(["optgen", "check", "--schema", "s.json"]).is_err());
    }
}
