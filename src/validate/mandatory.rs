//! Mandatory field enforcement

use crate::builder::PendingField;
use crate::schema::OptionsSchema;

use super::errors::FieldError;

/// Emits one `Required` error per mandatory field still unset, in schema
/// declaration order. Must run after defaults are applied.
pub fn enforce_mandatory(schema: &OptionsSchema, pending: &[PendingField]) -> Vec<FieldError> {
    schema
        .fields()
        .iter()
        .zip(pending)
        .filter(|(field, slot)| field.is_mandatory() && !slot.is_set())
        .map(|(field, _)| FieldError::required(field.name()))
        .collect()
}
