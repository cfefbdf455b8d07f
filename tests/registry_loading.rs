//! Registry Loading Tests
//!
//! Declarations are compiled when they load. These tests check that:
//! - directories load in file name order
//! - a defective declaration is refused before any builder exists
//! - loaded schemas drive the builder like programmatic ones

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use optgen::schema::{RuleKind, SchemaRegistry, TypeTag};
use optgen::Builder;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_json(dir: &Path, file: &str, body: serde_json::Value) {
    fs::write(dir.join(file), body.to_string()).unwrap();
}

fn service_decl() -> serde_json::Value {
    json!({
        "name": "ServiceOptions",
        "description": "Options of the example service",
        "fields": [
            {"name": "endpoint", "type": "string", "mandatory": true, "validate": "required,url"},
            {"name": "timeout", "type": "duration", "default": "30s", "validate": "min=1s"},
            {"name": "retries", "type": "int", "default": "3", "validate": "min=0"}
        ]
    })
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_load_dir_registers_every_file() {
    let tmp = TempDir::new().unwrap();
    write_json(tmp.path(), "b_service.json", service_decl());
    write_json(
        tmp.path(),
        "a_pool.json",
        json!({
            "name": "PoolOptions",
            "fields": [{"name": "workers", "type": "int", "default": "4", "validate": "min=1"}]
        }),
    );
    fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

    let mut registry = SchemaRegistry::new();
    assert_eq!(registry.load_dir(tmp.path()).unwrap(), 2);
    assert_eq!(registry.len(), 2);

    let names: Vec<&str> = registry.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["PoolOptions", "ServiceOptions"]);

    let timeout = registry.schema_for("ServiceOptions", "timeout").unwrap();
    assert_eq!(timeout.kind(), TypeTag::Duration);
    assert_eq!(timeout.default_literal(), Some("30s"));
    assert_eq!(
        registry.get("ServiceOptions").unwrap().description(),
        Some("Options of the example service")
    );
}

#[test]
fn test_loaded_schema_drives_builder() {
    let tmp = TempDir::new().unwrap();
    write_json(tmp.path(), "service.json", service_decl());

    let mut registry = SchemaRegistry::new();
    let schema = registry.load_file(&tmp.path().join("service.json")).unwrap();

    let mut builder = Builder::new(Arc::clone(&schema));
    builder.set("timeout", Duration::from_millis(500)).unwrap();
    let errors = builder.finalize().unwrap_err();
    let rules: Vec<RuleKind> = errors.iter().map(|e| e.rule).collect();
    assert_eq!(rules, vec![RuleKind::Required, RuleKind::MinDuration]);

    let mut builder = Builder::new(schema);
    builder.set_literal("endpoint", "https://api.example.com").unwrap();
    builder.set_literal("retries", "9").unwrap();
    let config = builder.finalize().unwrap();
    assert_eq!(config.int("retries"), Some(9));
    assert_eq!(config.duration("timeout"), Some(Duration::from_secs(30)));
}

// =============================================================================
// Defect Tests
// =============================================================================

/// Each defect is refused at load with its own code.
#[test]
fn test_defective_declarations_are_refused() {
    let cases = vec![
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "int", "mandatory": true, "default": "1"}]}),
            "OPT_SCHEMA_MANDATORY_WITH_DEFAULT",
        ),
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "int"}]}),
            "OPT_SCHEMA_IMPLICIT_ZERO_VALUE",
        ),
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "string", "optional": true, "validate": "email"}]}),
            "OPT_SCHEMA_UNKNOWN_RULE",
        ),
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "bool", "optional": true, "validate": "url"}]}),
            "OPT_SCHEMA_RULE_NOT_APPLICABLE",
        ),
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "duration", "default": "soon"}]}),
            "OPT_SCHEMA_MALFORMED_DEFAULT",
        ),
        (
            json!({"name": "A", "fields": [
                {"name": "x", "type": "int", "optional": true},
                {"name": "x", "type": "int", "optional": true}
            ]}),
            "OPT_SCHEMA_DUPLICATE_FIELD",
        ),
        (
            json!({"name": "A", "fields": [{"name": "x", "type": "complex", "optional": true}]}),
            "OPT_SCHEMA_MALFORMED",
        ),
        (
            json!({"name": "A", "fields": [
                {"name": "endpoint", "type": "string", "optional": true, "validation": "required,url"}
            ]}),
            "OPT_SCHEMA_MALFORMED",
        ),
        (
            json!({"name": "A", "describe": "typo", "fields": []}),
            "OPT_SCHEMA_MALFORMED",
        ),
    ];

    for (decl, code) in cases {
        let tmp = TempDir::new().unwrap();
        write_json(tmp.path(), "decl.json", decl);

        let mut registry = SchemaRegistry::new();
        let err = registry.load_file(&tmp.path().join("decl.json")).unwrap_err();
        assert_eq!(err.code(), code);
        assert!(err.is_fatal());
        assert!(registry.is_empty());
    }
}

#[test]
fn test_duplicate_schema_name_is_refused() {
    let tmp = TempDir::new().unwrap();
    write_json(tmp.path(), "one.json", service_decl());
    write_json(tmp.path(), "two.json", service_decl());

    let mut registry = SchemaRegistry::new();
    let err = registry.load_dir(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "OPT_SCHEMA_DUPLICATE_SCHEMA");
    assert!(registry.is_empty());
}

/// A defective file keeps every other file of the directory out too.
#[test]
fn test_defective_file_aborts_whole_directory() {
    let tmp = TempDir::new().unwrap();
    write_json(tmp.path(), "a_service.json", service_decl());
    write_json(
        tmp.path(),
        "b_broken.json",
        json!({"name": "Broken", "fields": [{"name": "port", "type": "int", "mandatory": true, "validate": "url"}]}),
    );

    let mut registry = SchemaRegistry::new();
    let err = registry.load_dir(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "OPT_SCHEMA_RULE_NOT_APPLICABLE");
    assert!(registry.get("ServiceOptions").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_missing_file_is_malformed() {
    let tmp = TempDir::new().unwrap();
    let mut registry = SchemaRegistry::new();

    let err = registry
        .load_file(&tmp.path().join("absent.json"))
        .unwrap_err();
    assert_eq!(err.code(), "OPT_SCHEMA_MALFORMED");
}
