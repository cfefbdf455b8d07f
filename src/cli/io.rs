//! JSON I/O handling for the CLI
//!
//! - Input: declaration files and an optional values file
//! - Output: one JSON object per command on stdout
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{json, Map, Value as Json};

use crate::builder::{Setter, SetterError};
use crate::schema::{literal, OptionsSchema, TypeTag, Value};
use crate::validate::ValidationErrors;

use super::errors::{CliError, CliResult};

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Json) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(out, &response)
}

/// Write every field error of a failed finalize
pub fn write_validation_errors<W: Write>(out: &mut W, errors: &ValidationErrors) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": errors.code(),
        "errors": errors
    });
    write_line(out, &response)
}

fn write_line<W: Write>(out: &mut W, response: &Json) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Read a values file: a JSON object mapping field names to values
pub fn read_values(path: &Path) -> CliResult<Map<String, Json>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read values file '{}': {}", path.display(), e))
    })?;

    let parsed = serde_json::from_str::<Json>(&content).map_err(|e| {
        CliError::usage_error(format!(
            "Values file '{}' is not valid JSON: {}",
            path.display(),
            e
        ))
    })?;

    match parsed {
        Json::Object(map) => Ok(map),
        _ => Err(CliError::usage_error(format!(
            "Values file '{}' must contain a JSON object",
            path.display()
        ))),
    }
}

/// Converts a JSON value into a setter for `field`.
///
/// Durations are written as duration strings (`"30s"`).
pub fn json_setter(schema: &OptionsSchema, field: &str, json: &Json) -> Result<Setter, SetterError> {
    let kind = schema
        .schema_for(field)
        .map(|f| f.kind())
        .ok_or_else(|| SetterError::UnknownField {
            schema: schema.name().to_string(),
            field: field.to_string(),
        })?;

    let value = match (kind, json) {
        (TypeTag::String, Json::String(s)) => Some(Value::String(s.clone())),
        (TypeTag::Int, Json::Number(n)) => n.as_i64().map(Value::Int),
        (TypeTag::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (TypeTag::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
        (TypeTag::Duration, Json::String(s)) => Some(
            literal::parse(TypeTag::Duration, s).map_err(|reason| SetterError::InvalidLiteral {
                field: field.to_string(),
                reason,
            })?,
        ),
        _ => None,
    };

    value
        .map(|value| Setter::new(field.to_string(), value))
        .ok_or_else(|| SetterError::InvalidLiteral {
            field: field.to_string(),
            reason: format!("expected {}, got JSON {}", kind, json),
        })
}

/// Splits a `field=value` assignment
pub fn split_assignment(raw: &str) -> CliResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field, value)),
        _ => Err(CliError::usage_error(format!(
            "Expected FIELD=VALUE, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use crate::schema::{FieldDecl, SchemaDecl};
    use std::time::Duration;

    fn schema() -> OptionsSchema {
        SchemaDecl::new(
            "S",
            vec![
                FieldDecl::mandatory("endpoint", TypeTag::String),
                FieldDecl::with_default("timeout", TypeTag::Duration, "30s"),
                FieldDecl::with_default("retries", TypeTag::Int, "3"),
            ],
        )
        .compile()
        .unwrap()
    }

    #[test]
    fn test_json_setter_by_type() {
        let schema = schema();

        let setter = json_setter(&schema, "timeout", &json!("2s")).unwrap();
        assert_eq!(setter.value(), &Value::Duration(Duration::from_secs(2)));

        let setter = json_setter(&schema, "retries", &json!(7)).unwrap();
        assert_eq!(setter.value(), &Value::Int(7));
    }

    #[test]
    fn test_json_setter_rejects_wrong_json_type() {
        let schema = schema();

        let err = json_setter(&schema, "retries", &json!("7")).unwrap_err();
        assert_eq!(err.code(), "OPT_SETTER_INVALID_LITERAL");

        let err = json_setter(&schema, "retries", &json!(1.5)).unwrap_err();
        assert_eq!(err.code(), "OPT_SETTER_INVALID_LITERAL");

        let err = json_setter(&schema, "port", &json!(80)).unwrap_err();
        assert_eq!(err.code(), "OPT_SETTER_UNKNOWN_FIELD");
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(split_assignment("label=").unwrap(), ("label", ""));
        assert!(split_assignment("novalue").is_err());
        assert!(split_assignment("=x").is_err());
    }

    #[test]
    fn test_read_values_rejects_bad_content_as_usage() {
        let dir = tempfile::TempDir::new().unwrap();

        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"retries\": ").unwrap();
        let err = read_values(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UsageError);

        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2]").unwrap();
        let err = read_values(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UsageError);

        let err = read_values(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }

    #[test]
    fn test_write_error_shape() {
        let mut out = Vec::new();
        write_error(&mut out, "OPT_CLI_USAGE_ERROR", "bad").unwrap();

        let parsed: Json = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "OPT_CLI_USAGE_ERROR");
    }
}
