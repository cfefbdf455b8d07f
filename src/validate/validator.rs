//! Finalize-time orchestration
//!
//! Order is fixed: defaults, then the mandatory check, then rules. A field
//! populated by a default is therefore rule-checked like any other.
//! Errors are collected across all fields; nothing short-circuits.

use tracing::{debug, warn};

use crate::builder::{Builder, Configuration};
use crate::observability::Event;
use crate::schema::Value;

use super::defaults::apply_defaults;
use super::errors::ValidationErrors;
use super::evaluator::evaluate;
use super::mandatory::enforce_mandatory;

/// Either a sealed configuration or every field error found.
pub type ValidationOutcome = Result<Configuration, ValidationErrors>;

/// Validator that turns a builder into a validation outcome.
///
/// Validation is deterministic and side-effect free: identical setter
/// sequences always produce identical outcomes.
pub struct Validator;

impl Validator {
    /// Consumes the builder and validates its pending fields.
    pub fn finalize(builder: Builder) -> ValidationOutcome {
        let (schema, mut pending) = builder.into_parts();

        apply_defaults(&schema, &mut pending);

        let mut errors = enforce_mandatory(&schema, &pending);
        for (field, slot) in schema.fields().iter().zip(&pending) {
            if let Some(value) = slot.value() {
                errors.extend(evaluate(field, value));
            }
        }

        if let Some(errors) = ValidationErrors::from_vec(errors) {
            warn!(
                event = %Event::ValidationFailed,
                schema = schema.name(),
                errors = errors.len(),
                "validation failed"
            );
            return Err(errors);
        }

        // With no errors left, every mandatory field was set and every other
        // field was filled by apply_defaults.
        let values: Vec<Value> = schema
            .fields()
            .iter()
            .zip(pending)
            .map(|(field, slot)| slot.into_value().unwrap_or_else(|| Value::zero(field.kind())))
            .collect();

        debug!(
            event = %Event::BuildFinalized,
            schema = schema.name(),
            fields = values.len(),
            "configuration sealed"
        );
        Ok(Configuration::seal(schema, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDecl, RuleKind, SchemaDecl, TypeTag};
    use std::sync::Arc;
    use std::time::Duration;

    fn service_schema() -> Arc<crate::schema::OptionsSchema> {
        Arc::new(
            SchemaDecl::new(
                "ServiceOptions",
                vec![
                    FieldDecl::mandatory("endpoint", TypeTag::String).validate("required,url"),
                    FieldDecl::with_default("timeout", TypeTag::Duration, "30s").validate("min=1s"),
                    FieldDecl::with_default("retries", TypeTag::Int, "3").validate("min=0"),
                ],
            )
            .compile()
            .unwrap(),
        )
    }

    #[test]
    fn test_missing_endpoint_and_short_timeout() {
        let mut builder = Builder::new(service_schema());
        builder
            .set("timeout", Duration::from_millis(500))
            .unwrap();

        let errors = Validator::finalize(builder).unwrap_err();
        let reported: Vec<(&str, RuleKind)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.rule))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("endpoint", RuleKind::Required),
                ("timeout", RuleKind::MinDuration),
            ]
        );
    }

    #[test]
    fn test_defaults_are_sealed() {
        let mut builder = Builder::new(service_schema());
        builder.set("endpoint", "https://api.example.com").unwrap();

        let config = Validator::finalize(builder).unwrap();
        assert_eq!(config.duration("timeout"), Some(Duration::from_secs(30)));
        assert_eq!(config.int("retries"), Some(3));
        assert_eq!(config.string("endpoint"), Some("https://api.example.com"));
    }

    #[test]
    fn test_unset_mandatory_skips_its_rules() {
        let errors = Validator::finalize(Builder::new(service_schema())).unwrap_err();
        assert_eq!(errors.for_field("endpoint").count(), 1);
    }

    #[test]
    fn test_defaults_are_rule_checked() {
        let schema = Arc::new(
            SchemaDecl::new(
                "Odd",
                vec![FieldDecl::with_default("workers", TypeTag::Int, "0").validate("min=1")],
            )
            .compile()
            .unwrap(),
        );

        let errors = Validator::finalize(Builder::new(schema)).unwrap_err();
        assert_eq!(errors.errors()[0].rule, RuleKind::MinValue);
    }
}
