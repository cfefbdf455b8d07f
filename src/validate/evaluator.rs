//! Rule evaluation
//!
//! Rules are pure: each inspects one value and either passes or yields a
//! `FieldError`. Every rule of a field runs, so one pass reports all of
//! the field's violations.

use std::cmp::Ordering;

use url::Url;

use crate::schema::{Constraint, FieldSchema, RuleKind, RuleSpec, Value};

use super::errors::FieldError;

/// Runs every rule of `field` against `value`, in declaration order.
pub fn evaluate(field: &FieldSchema, value: &Value) -> Vec<FieldError> {
    field
        .rules()
        .iter()
        .filter_map(|rule| check(field.name(), rule, value))
        .collect()
}

/// Checks a single rule. Returns `None` when the value passes.
pub fn check(field: &str, rule: &RuleSpec, value: &Value) -> Option<FieldError> {
    let message = match &rule.constraint {
        Constraint::NonZero => {
            if !value.is_zero() {
                return None;
            }
            match value {
                Value::String(_) => format!("{} must not be empty", field),
                _ => format!("{} must not be zero", field),
            }
        }
        Constraint::Lower { bound, inclusive } => {
            let passes = match value.compare(bound) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => *inclusive,
                _ => false,
            };
            if passes {
                return None;
            }
            let relation = if *inclusive { "at least" } else { "greater than" };
            bound_message(field, rule.kind(), relation, bound, value)
        }
        Constraint::Upper { bound, inclusive } => {
            let passes = match value.compare(bound) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => *inclusive,
                _ => false,
            };
            if passes {
                return None;
            }
            let relation = if *inclusive { "at most" } else { "less than" };
            bound_message(field, rule.kind(), relation, bound, value)
        }
        Constraint::Url => {
            if value.as_str().is_some_and(is_absolute_url) {
                return None;
            }
            format!(
                "{} must be an absolute URL with scheme and host, got '{}'",
                field, value
            )
        }
        Constraint::OneOf(allowed) => {
            if allowed.contains(value) {
                return None;
            }
            let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            format!("{} must be one of [{}], got '{}'", field, listed.join(" "), value)
        }
    };

    Some(FieldError::new(field, rule.kind(), message))
}

fn bound_message(field: &str, kind: RuleKind, relation: &str, bound: &Value, value: &Value) -> String {
    match (kind, value) {
        (RuleKind::MinLength | RuleKind::MaxLength, Value::String(s)) => format!(
            "length of {} must be {} {}, got {}",
            field,
            relation,
            bound,
            s.chars().count()
        ),
        _ => format!("{} must be {} {}, got {}", field, relation, bound, value),
    }
}

fn is_absolute_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}
