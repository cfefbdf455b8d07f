//! Sealed configuration
//!
//! Produced only by a finalize that found zero field errors. It has no
//! mutating methods, so it can be shared across threads for reads.

use std::sync::Arc;
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::{OptionsSchema, Value};

/// Validated, read-only field values in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    schema: Arc<OptionsSchema>,
    values: Vec<Value>,
}

impl Configuration {
    /// `values` must hold one entry per schema field, in declaration order.
    pub(crate) fn seal(schema: Arc<OptionsSchema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &OptionsSchema {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema.index_of(field).and_then(|i| self.values.get(i))
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_float)
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn duration(&self, field: &str) -> Option<Duration> {
        self.get(field).and_then(Value::as_duration)
    }

    /// `(field, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
