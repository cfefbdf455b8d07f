//! Rule expressions
//!
//! A rule expression is a comma-separated list of `name` or `name=param`
//! items, for example `required,url` or `min=1s,max=1m`. The grammar is
//! closed; every parameter is parsed and type-checked when the schema loads.
//!
//! | rule       | param                     | types                       |
//! |------------|---------------------------|-----------------------------|
//! | `required` | none                      | all                         |
//! | `min`/`gt` | lower bound (incl./excl.) | int, float, duration, string length |
//! | `max`/`lt` | upper bound (incl./excl.) | int, float, duration, string length |
//! | `url`      | none                      | string                      |
//! | `oneof`    | space-separated literals  | string, int                 |

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::errors::{SchemaError, SchemaResult};
use super::literal;
use super::types::{TypeTag, Value};

/// Kind of a validation rule, resolved against the field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Value differs from the type's zero value
    Required,
    MinValue,
    MinDuration,
    MinLength,
    MaxValue,
    MaxDuration,
    MaxLength,
    /// Absolute URL with scheme and host
    UrlFormat,
    OneOf,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinValue => "min_value",
            RuleKind::MinDuration => "min_duration",
            RuleKind::MinLength => "min_length",
            RuleKind::MaxValue => "max_value",
            RuleKind::MaxDuration => "max_duration",
            RuleKind::MaxLength => "max_length",
            RuleKind::UrlFormat => "url_format",
            RuleKind::OneOf => "one_of",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed form of a rule, checked against values at finalize time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Constraint {
    NonZero,
    Lower { bound: Value, inclusive: bool },
    Upper { bound: Value, inclusive: bool },
    Url,
    OneOf(Vec<Value>),
}

/// One declared rule: its kind, its raw parameters, and the compiled
/// constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSpec {
    kind: RuleKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
    #[serde(skip)]
    pub(crate) constraint: Constraint,
}

impl RuleSpec {
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Raw parameters: `bound` and `inclusive` for bound rules, `values`
    /// for `oneof`.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Parses a rule expression declared on `field` of type `kind`.
pub fn parse_rules(field: &str, kind: TypeTag, expr: &str) -> SchemaResult<Vec<RuleSpec>> {
    if expr.trim().is_empty() {
        return Ok(Vec::new());
    }
    expr.split(',')
        .map(|item| parse_rule(field, kind, item.trim()))
        .collect()
}

fn parse_rule(field: &str, kind: TypeTag, item: &str) -> SchemaResult<RuleSpec> {
    if item.is_empty() {
        return Err(SchemaError::invalid_param(field, "", "is an empty rule expression"));
    }
    let (name, param) = match item.split_once('=') {
        Some((name, param)) => (name.trim(), Some(param.trim())),
        None => (item, None),
    };

    match name {
        "required" => {
            no_param(field, name, param)?;
            Ok(RuleSpec {
                kind: RuleKind::Required,
                params: BTreeMap::new(),
                constraint: Constraint::NonZero,
            })
        }
        "url" => {
            no_param(field, name, param)?;
            applies_to(field, name, kind, &[TypeTag::String])?;
            Ok(RuleSpec {
                kind: RuleKind::UrlFormat,
                params: BTreeMap::new(),
                constraint: Constraint::Url,
            })
        }
        "min" | "gt" | "max" | "lt" => {
            let raw = required_param(field, name, param)?;
            applies_to(
                field,
                name,
                kind,
                &[TypeTag::Int, TypeTag::Float, TypeTag::Duration, TypeTag::String],
            )?;
            let bound = parse_bound(field, name, kind, raw)?;
            let inclusive = matches!(name, "min" | "max");
            let lower = matches!(name, "min" | "gt");

            let mut params = BTreeMap::new();
            params.insert("bound".to_string(), raw.to_string());
            params.insert("inclusive".to_string(), inclusive.to_string());

            let (rule_kind, constraint) = if lower {
                (lower_kind(kind), Constraint::Lower { bound, inclusive })
            } else {
                (upper_kind(kind), Constraint::Upper { bound, inclusive })
            };
            Ok(RuleSpec {
                kind: rule_kind,
                params,
                constraint,
            })
        }
        "oneof" => {
            let raw = required_param(field, name, param)?;
            applies_to(field, name, kind, &[TypeTag::String, TypeTag::Int])?;
            let values = raw
                .split_whitespace()
                .map(|v| {
                    literal::parse(kind, v)
                        .map_err(|reason| SchemaError::invalid_param(field, name, reason))
                })
                .collect::<SchemaResult<Vec<_>>>()?;
            if values.is_empty() {
                return Err(SchemaError::invalid_param(field, name, "needs at least one value"));
            }

            let mut params = BTreeMap::new();
            params.insert("values".to_string(), raw.to_string());
            Ok(RuleSpec {
                kind: RuleKind::OneOf,
                params,
                constraint: Constraint::OneOf(values),
            })
        }
        other => Err(SchemaError::UnknownRule {
            field: field.to_string(),
            rule: other.to_string(),
        }),
    }
}

fn no_param(field: &str, rule: &str, param: Option<&str>) -> SchemaResult<()> {
    match param {
        Some(p) => Err(SchemaError::invalid_param(
            field,
            rule,
            format!("takes no parameter, got '{}'", p),
        )),
        None => Ok(()),
    }
}

fn required_param<'a>(field: &str, rule: &str, param: Option<&'a str>) -> SchemaResult<&'a str> {
    match param {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(SchemaError::invalid_param(field, rule, "requires a parameter")),
    }
}

fn applies_to(field: &str, rule: &str, kind: TypeTag, allowed: &[TypeTag]) -> SchemaResult<()> {
    if allowed.contains(&kind) {
        Ok(())
    } else {
        Err(SchemaError::RuleNotApplicable {
            field: field.to_string(),
            rule: rule.to_string(),
            kind,
        })
    }
}

/// String bounds constrain length and are written as non-negative ints.
fn parse_bound(field: &str, rule: &str, kind: TypeTag, raw: &str) -> SchemaResult<Value> {
    if kind == TypeTag::String {
        return match raw.parse::<i64>() {
            Ok(len) if len >= 0 => Ok(Value::Int(len)),
            _ => Err(SchemaError::invalid_param(
                field,
                rule,
                format!("length bound '{}' must be a non-negative int", raw),
            )),
        };
    }
    literal::parse(kind, raw).map_err(|reason| SchemaError::invalid_param(field, rule, reason))
}

fn lower_kind(kind: TypeTag) -> RuleKind {
    match kind {
        TypeTag::Duration => RuleKind::MinDuration,
        TypeTag::String => RuleKind::MinLength,
        _ => RuleKind::MinValue,
    }
}

fn upper_kind(kind: TypeTag) -> RuleKind {
    match kind {
        TypeTag::Duration => RuleKind::MaxDuration,
        TypeTag::String => RuleKind::MaxLength,
        _ => RuleKind::MaxValue,
    }
}
