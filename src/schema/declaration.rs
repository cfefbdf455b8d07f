//! Field declarations as authored
//!
//! Declarations are the input format. They are compiled once into
//! [`OptionsSchema`](super::OptionsSchema) by the registry; nothing reads
//! them at build time.
//!
//! JSON form:
//!
//! ```json
//! {
//!   "name": "ServiceOptions",
//!   "fields": [
//!     {"name": "endpoint", "type": "string", "mandatory": true, "validate": "required,url"},
//!     {"name": "timeout", "type": "duration", "default": "30s", "validate": "min=1s"},
//!     {"name": "label", "type": "string", "optional": true}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::literal;
use super::rules::parse_rules;
use super::types::{FieldSchema, OptionsSchema, Presence, TypeTag};

/// Declaration of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TypeTag,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
}

impl FieldDecl {
    /// Create a mandatory field
    pub fn mandatory(name: impl Into<String>, kind: TypeTag) -> Self {
        Self {
            name: name.into(),
            kind,
            mandatory: true,
            default: None,
            optional: false,
            validate: None,
        }
    }

    /// Create a field with a default literal
    pub fn with_default(name: impl Into<String>, kind: TypeTag, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            mandatory: false,
            default: Some(literal.into()),
            optional: false,
            validate: None,
        }
    }

    /// Create an optional field that falls back to its zero value
    pub fn optional(name: impl Into<String>, kind: TypeTag) -> Self {
        Self {
            name: name.into(),
            kind,
            mandatory: false,
            default: None,
            optional: true,
            validate: None,
        }
    }

    /// Attach a rule expression
    pub fn validate(mut self, expr: impl Into<String>) -> Self {
        self.validate = Some(expr.into());
        self
    }

    fn presence(&self) -> SchemaResult<Presence> {
        match (self.mandatory, &self.default, self.optional) {
            (true, Some(default), _) => Err(SchemaError::MandatoryWithDefault {
                field: self.name.clone(),
                default: default.clone(),
            }),
            (true, None, true) | (false, Some(_), true) => Err(SchemaError::ConflictingPresence {
                field: self.name.clone(),
            }),
            (true, None, false) => Ok(Presence::Mandatory),
            (false, Some(default), false) => Ok(Presence::Default(default.clone())),
            (false, None, true) => Ok(Presence::Optional),
            (false, None, false) => Err(SchemaError::ImplicitZeroValue {
                field: self.name.clone(),
            }),
        }
    }

    /// Compiles the declaration, parsing the default literal and the rule
    /// expression.
    pub fn compile(&self) -> SchemaResult<FieldSchema> {
        let presence = self.presence()?;

        let default_value = match &presence {
            Presence::Default(raw) => Some(literal::parse(self.kind, raw).map_err(|reason| {
                SchemaError::MalformedDefault {
                    field: self.name.clone(),
                    literal: raw.clone(),
                    kind: self.kind,
                    reason,
                }
            })?),
            _ => None,
        };

        let rules = match &self.validate {
            Some(expr) => parse_rules(&self.name, self.kind, expr)?,
            None => Vec::new(),
        };

        Ok(FieldSchema {
            name: self.name.clone(),
            kind: self.kind,
            presence,
            default_value,
            rules,
        })
    }
}

/// Declaration of a named set of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDecl>,
}

impl SchemaDecl {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Compiles every field in declaration order. The first defect aborts.
    pub fn compile(&self) -> SchemaResult<OptionsSchema> {
        let mut fields: Vec<FieldSchema> = Vec::with_capacity(self.fields.len());
        for decl in &self.fields {
            if fields.iter().any(|f| f.name == decl.name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: decl.name.clone(),
                });
            }
            fields.push(decl.compile()?);
        }

        Ok(OptionsSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            fields,
        })
    }
}
