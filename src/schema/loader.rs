//! Schema registry
//!
//! Declarations are compiled exactly once, at load time, and the resulting
//! schemas are read-only afterwards. Any defect in a declaration aborts the
//! load; nothing defective is ever registered.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::observability::Event;

use super::declaration::SchemaDecl;
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldSchema, OptionsSchema};

/// Registry of compiled schemas, keyed by schema name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<OptionsSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and registers a declaration.
    ///
    /// Registered schemas are immutable: registering the same name twice
    /// is a defect.
    pub fn register(&mut self, decl: &SchemaDecl) -> SchemaResult<Arc<OptionsSchema>> {
        let schema = self.compile_new(decl, &BTreeMap::new())?;
        self.insert(Arc::clone(&schema));
        Ok(schema)
    }

    /// Loads a single JSON declaration file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<OptionsSchema>> {
        let decl = read_decl(path)?;
        self.register(&decl)
    }

    /// Loads every `*.json` file in `dir`, in file name order.
    ///
    /// All-or-nothing: if any file is defective, none of the directory's
    /// schemas are registered.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            rejected(SchemaError::malformed(
                dir.display().to_string(),
                format!("failed to read directory: {}", e),
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                rejected(SchemaError::malformed(
                    dir.display().to_string(),
                    format!("failed to read directory entry: {}", e),
                ))
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut staged = BTreeMap::new();
        for path in &paths {
            let decl = read_decl(path)?;
            let schema = self.compile_new(&decl, &staged)?;
            staged.insert(schema.name.clone(), schema);
        }

        let count = staged.len();
        for schema in staged.into_values() {
            self.insert(schema);
        }

        info!(
            event = %Event::SchemasLoaded,
            dir = %dir.display(),
            count,
            "schemas loaded"
        );
        Ok(count)
    }

    /// Loads `path` as a directory of declarations or as a single file.
    pub fn load_path(&mut self, path: &Path) -> SchemaResult<usize> {
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path).map(|_| 1)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<OptionsSchema>> {
        self.schemas.get(name)
    }

    /// Looks up the schema of `field` within schema `name`.
    pub fn schema_for(&self, name: &str, field: &str) -> Option<&FieldSchema> {
        self.get(name).and_then(|schema| schema.schema_for(field))
    }

    /// Registered schemas in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<OptionsSchema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn compile_new(
        &self,
        decl: &SchemaDecl,
        staged: &BTreeMap<String, Arc<OptionsSchema>>,
    ) -> SchemaResult<Arc<OptionsSchema>> {
        if self.schemas.contains_key(&decl.name) || staged.contains_key(&decl.name) {
            return Err(rejected(SchemaError::DuplicateSchema {
                schema: decl.name.clone(),
            }));
        }
        decl.compile().map(Arc::new).map_err(rejected)
    }

    fn insert(&mut self, schema: Arc<OptionsSchema>) {
        debug!(
            event = %Event::SchemaRegistered,
            schema = %schema.name,
            fields = schema.len(),
            "schema registered"
        );
        self.schemas.insert(schema.name.clone(), schema);
    }
}

fn read_decl(path: &Path) -> SchemaResult<SchemaDecl> {
    let content = fs::read_to_string(path).map_err(|e| {
        rejected(SchemaError::malformed(
            path.display().to_string(),
            format!("failed to read file: {}", e),
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        rejected(SchemaError::malformed(
            path.display().to_string(),
            format!("invalid JSON: {}", e),
        ))
    })
}

fn rejected(err: SchemaError) -> SchemaError {
    error!(event = %Event::SchemaRejected, code = err.code(), "{}", err);
    err
}
