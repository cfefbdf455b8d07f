//! Setters and pending field state

use std::borrow::Cow;

use crate::schema::Value;

/// A single field assignment, applied by [`Builder::apply`](super::Builder::apply).
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    field: Cow<'static, str>,
    value: Value,
}

impl Setter {
    pub fn new(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn into_value(self) -> Value {
        self.value
    }
}

/// Per-build state of one field. Unset until a setter or the default
/// engine assigns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingField {
    value: Option<Value>,
}

impl PendingField {
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Overwrites any previous value.
    pub(crate) fn assign(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub(crate) fn into_value(self) -> Option<Value> {
        self.value
    }
}
