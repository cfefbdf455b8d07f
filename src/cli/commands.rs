//! CLI command implementations
//!
//! Commands are thin consumers of the library: they load declarations into
//! a registry, drive a builder, and print the outcome as JSON.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::builder::Builder;
use crate::observability::init_logging;
use crate::schema::{OptionsSchema, SchemaRegistry};

use super::args::{Cli, Command};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{
    json_setter, read_values, split_assignment, write_error, write_response,
    write_validation_errors,
};

/// Parse arguments, install logging, and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run_command(cli.command, &mut out);

    // Validation failures already printed their field errors.
    if let Err(e) = &result {
        if e.code() != &CliErrorCode::ValidationFailed {
            write_error(&mut out, e.code_str(), e.message())?;
        }
    }
    result
}

/// Dispatch a parsed command, writing its response to `out`.
pub fn run_command<W: Write>(command: Command, out: &mut W) -> CliResult<()> {
    match command {
        Command::Describe { schema, name } => describe(&schema, name.as_deref(), out),
        Command::Check {
            schema,
            name,
            values,
            set,
        } => check(&schema, &name, values.as_deref(), &set, out),
    }
}

/// Print compiled schemas.
pub fn describe<W: Write>(schema_path: &Path, name: Option<&str>, out: &mut W) -> CliResult<()> {
    let registry = load_registry(schema_path)?;

    let schemas: Vec<&OptionsSchema> = match name {
        Some(name) => vec![registry
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| CliError::unknown_schema(name))?],
        None => registry.iter().map(Arc::as_ref).collect(),
    };

    write_response(out, serde_json::to_value(&schemas)?)
}

/// Build one option set: values file first, then each assignment in order.
pub fn check<W: Write>(
    schema_path: &Path,
    name: &str,
    values: Option<&Path>,
    assignments: &[String],
    out: &mut W,
) -> CliResult<()> {
    let registry = load_registry(schema_path)?;
    let schema = registry
        .get(name)
        .cloned()
        .ok_or_else(|| CliError::unknown_schema(name))?;

    let mut builder = Builder::new(Arc::clone(&schema));

    if let Some(path) = values {
        for (field, json) in read_values(path)? {
            builder.apply(json_setter(&schema, &field, &json)?)?;
        }
    }

    for raw in assignments {
        let (field, value) = split_assignment(raw)?;
        builder.set_literal(field, value)?;
    }

    match builder.finalize() {
        Ok(config) => write_response(out, serde_json::to_value(&config)?),
        Err(errors) => {
            write_validation_errors(out, &errors)?;
            Err(CliError::validation_failed(errors.len()))
        }
    }
}

fn load_registry(path: &Path) -> CliResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.load_path(path)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_schema(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("service.json");
        let decl = json!({
            "name": "ServiceOptions",
            "fields": [
                {"name": "endpoint", "type": "string", "mandatory": true, "validate": "required,url"},
                {"name": "timeout", "type": "duration", "default": "30s", "validate": "min=1s"},
                {"name": "retries", "type": "int", "default": "3", "validate": "min=0"}
            ]
        });
        fs::write(&path, decl.to_string()).unwrap();
        path
    }

    fn sets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_check_prints_sealed_configuration() {
        let dir = TempDir::new().unwrap();
        let schema = write_schema(&dir);
        let mut out = Vec::new();

        check(
            &schema,
            "ServiceOptions",
            None,
            &sets(&["endpoint=https://api.example.com", "retries=1", "retries=5"]),
            &mut out,
        )
        .unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["endpoint"], "https://api.example.com");
        assert_eq!(parsed["data"]["timeout"], "30s");
        assert_eq!(parsed["data"]["retries"], 5);
    }

    #[test]
    fn test_check_reports_every_error() {
        let dir = TempDir::new().unwrap();
        let schema = write_schema(&dir);
        let mut out = Vec::new();

        let err = check(&schema, "ServiceOptions", None, &sets(&["timeout=500ms"]), &mut out)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ValidationFailed);

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["code"], "OPT_VALIDATION_FAILED");
        assert_eq!(parsed["errors"][0]["field"], "endpoint");
        assert_eq!(parsed["errors"][0]["rule"], "required");
        assert_eq!(parsed["errors"][1]["field"], "timeout");
        assert_eq!(parsed["errors"][1]["rule"], "min_duration");
    }

    #[test]
    fn test_set_overrides_values_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_schema(&dir);
        let values = dir.path().join("values.json");
        fs::write(
            &values,
            json!({"endpoint": "https://a.example.com", "timeout": "5s"}).to_string(),
        )
        .unwrap();
        let mut out = Vec::new();

        check(
            &schema,
            "ServiceOptions",
            Some(&values),
            &sets(&["timeout=10s"]),
            &mut out,
        )
        .unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["data"]["timeout"], "10s");
        assert_eq!(parsed["data"]["endpoint"], "https://a.example.com");
    }

    #[test]
    fn test_unknown_schema_and_field() {
        let dir = TempDir::new().unwrap();
        let schema = write_schema(&dir);
        let mut out = Vec::new();

        let err = check(&schema, "Nope", None, &[], &mut out).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnknownSchema);

        let err = check(&schema, "ServiceOptions", None, &sets(&["port=80"]), &mut out)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SetterRejected);
    }

    #[test]
    fn test_describe_lists_rules() {
        let dir = TempDir::new().unwrap();
        write_schema(&dir);
        let mut out = Vec::new();

        describe(dir.path(), Some("ServiceOptions"), &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let fields = &parsed["data"][0]["fields"];
        assert_eq!(fields[0]["name"], "endpoint");
        assert_eq!(fields[0]["presence"], "mandatory");
        assert_eq!(fields[0]["rules"][1]["kind"], "url_format");
        assert_eq!(fields[1]["presence"]["default"], "30s");
        assert_eq!(fields[1]["rules"][0]["params"]["bound"], "1s");
    }

    #[test]
    fn test_defective_schema_fails_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(
            &path,
            json!({
                "name": "Broken",
                "fields": [{"name": "endpoint", "type": "string", "mandatory": true, "default": "x"}]
            })
            .to_string(),
        )
        .unwrap();
        let mut out = Vec::new();

        let err = describe(&path, None, &mut out).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(out.is_empty());
    }
}
