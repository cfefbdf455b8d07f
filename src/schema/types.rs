//! Field schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - duration: non-negative time span, written as `300ms`, `1m30s`, `2h`

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use super::literal;
use super::rules::RuleSpec;

/// Underlying type of a configurable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Int,
    Float,
    Bool,
    Duration,
}

impl TypeTag {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Duration => "duration",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl Value {
    /// The declared zero value for a type, used by optional fields left unset.
    pub fn zero(kind: TypeTag) -> Self {
        match kind {
            TypeTag::String => Value::String(String::new()),
            TypeTag::Int => Value::Int(0),
            TypeTag::Float => Value::Float(0.0),
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Duration => Value::Duration(Duration::ZERO),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::String(_) => TypeTag::String,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Bool(_) => TypeTag::Bool,
            Value::Duration(_) => TypeTag::Duration,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Value::zero(self.type_tag())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(v) => Some(*v),
            _ => None,
        }
    }

    /// Orders two values of the same type. Strings compare by length
    /// against an int bound, which is how length rules are expressed.
    pub(crate) fn compare(&self, bound: &Value) -> Option<Ordering> {
        match (self, bound) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            (Value::String(s), Value::Int(len)) => Some((s.chars().count() as i64).cmp(len)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Duration(d) => f.write_str(&literal::format_duration(*d)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Duration(d) => serializer.serialize_str(&literal::format_duration(*d)),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

/// How a field obtains its value when no setter touches it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// A setter must supply the value
    Mandatory,
    /// The literal is parsed into the value
    Default(String),
    /// The type's zero value is used
    Optional,
}

/// Compiled description of one configurable field.
///
/// Built once by the registry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) kind: TypeTag,
    pub(crate) presence: Presence,
    #[serde(skip)]
    pub(crate) default_value: Option<Value>,
    pub(crate) rules: Vec<RuleSpec>,
}

impl FieldSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeTag {
        self.kind
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_mandatory(&self) -> bool {
        self.presence == Presence::Mandatory
    }

    /// Returns the default literal as declared
    pub fn default_literal(&self) -> Option<&str> {
        match &self.presence {
            Presence::Default(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the default literal parsed into the field's type
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }
}

/// An ordered, named set of field schemas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsSchema {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) fields: Vec<FieldSchema>,
}

impl OptionsSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks up the schema of a single field.
    pub fn schema_for(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == field)
    }

    pub(crate) fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
