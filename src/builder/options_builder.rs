//! Options builder
//!
//! A builder accumulates setters for one schema. It is single-owner and
//! single-use: [`Builder::finalize`] consumes it, so no mutation can follow.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::observability::Event;
use crate::schema::{literal, OptionsSchema, Value};
use crate::validate::{ValidationOutcome, Validator};

use super::errors::{SetterError, SetterResult};
use super::setter::{PendingField, Setter};

/// Mutable accumulation of field values for one schema.
#[derive(Debug)]
pub struct Builder {
    schema: Arc<OptionsSchema>,
    pending: Vec<PendingField>,
}

impl Builder {
    /// Creates a builder with every field unset.
    pub fn new(schema: Arc<OptionsSchema>) -> Self {
        let pending = vec![PendingField::default(); schema.len()];
        Self { schema, pending }
    }

    /// Creates a builder and applies `setters` in order.
    pub fn with_setters<I>(schema: Arc<OptionsSchema>, setters: I) -> SetterResult<Self>
    where
        I: IntoIterator<Item = Setter>,
    {
        let mut builder = Self::new(schema);
        for setter in setters {
            builder.apply(setter)?;
        }
        Ok(builder)
    }

    pub fn schema(&self) -> &Arc<OptionsSchema> {
        &self.schema
    }

    /// Applies one setter. A later setter for the same field overwrites the
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Rejects a setter whose field is not declared or whose value has the
    /// wrong type. Nothing is modified in that case.
    pub fn apply(&mut self, setter: Setter) -> SetterResult<&mut Self> {
        let index = self.resolve(&setter)?;
        trace!(schema = self.schema.name(), field = setter.field(), "setter applied");
        self.pending[index].assign(setter.into_value());
        Ok(self)
    }

    /// Shorthand for `apply(Setter::new(field, value))`.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> SetterResult<&mut Self> {
        self.apply(Setter::new(field.to_string(), value))
    }

    /// Parses `raw` according to the field's type, then applies it.
    pub fn set_literal(&mut self, field: &str, raw: &str) -> SetterResult<&mut Self> {
        let kind = self
            .schema
            .schema_for(field)
            .map(|f| f.kind())
            .ok_or_else(|| self.rejected(self.unknown_field(field)))?;

        let value = literal::parse(kind, raw).map_err(|reason| {
            self.rejected(SetterError::InvalidLiteral {
                field: field.to_string(),
                reason,
            })
        })?;
        self.apply(Setter::new(field.to_string(), value))
    }

    /// Pending state of `field`, if declared.
    pub fn pending(&self, field: &str) -> Option<&PendingField> {
        self.schema.index_of(field).map(|i| &self.pending[i])
    }

    /// Runs defaults, the mandatory check and every rule, then seals the
    /// result.
    pub fn finalize(self) -> ValidationOutcome {
        Validator::finalize(self)
    }

    pub(crate) fn into_parts(self) -> (Arc<OptionsSchema>, Vec<PendingField>) {
        (self.schema, self.pending)
    }

    fn resolve(&self, setter: &Setter) -> SetterResult<usize> {
        let index = self
            .schema
            .index_of(setter.field())
            .ok_or_else(|| self.rejected(self.unknown_field(setter.field())))?;

        let expected = self.schema.fields()[index].kind();
        let actual = setter.value().type_tag();
        if expected != actual {
            return Err(self.rejected(SetterError::TypeMismatch {
                field: setter.field().to_string(),
                expected,
                actual,
            }));
        }
        Ok(index)
    }

    fn unknown_field(&self, field: &str) -> SetterError {
        SetterError::UnknownField {
            schema: self.schema.name().to_string(),
            field: field.to_string(),
        }
    }

    fn rejected(&self, err: SetterError) -> SetterError {
        warn!(
            event = %Event::SetterRejected,
            schema = self.schema.name(),
            code = err.code(),
            "{}",
            err
        );
        err
    }
}
