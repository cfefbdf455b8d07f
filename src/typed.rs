//! Typed options
//!
//! The [`options!`](crate::options) macro declares a strongly typed options
//! struct on top of the dynamic builder. Each field gets a setter
//! constructor taking `impl Into<FieldType>`, so a value of the wrong type
//! is rejected by the compiler rather than at finalize time.
//!
//! The declaration is compiled by the generated `load()`, which a consumer
//! calls once at startup. Schema defects surface there. Builds go through
//! the returned [`Compiled`] handle and can only fail on setters or
//! validation.
//!
//! ```
//! use std::time::Duration;
//! use optgen::options;
//!
//! options! {
//!     /// Options of the example service.
//!     pub struct ServiceOptions, setters = ServiceOptionsSetter {
//!         endpoint: String = mandatory, "required,url";
//!         timeout: Duration = default("30s"), "min=1s";
//!         retries: i64 = default("3"), "min=0";
//!     }
//! }
//!
//! let compiled = ServiceOptions::load().unwrap();
//! let opts = compiled
//!     .build([
//!         ServiceOptionsSetter::endpoint("https://api.example.com"),
//!         ServiceOptionsSetter::retries(5),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(opts.endpoint(), "https://api.example.com");
//! assert_eq!(*opts.timeout(), Duration::from_secs(30));
//! assert_eq!(*opts.retries(), 5);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::builder::{Builder, Configuration, Setter, SetterError};
use crate::schema::{OptionsSchema, SchemaDecl, SchemaError, TypeTag, Value};
use crate::validate::ValidationErrors;

/// Rust types that can back an options field.
pub trait OptionValue: Sized {
    const TYPE: TypeTag;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

impl OptionValue for String {
    const TYPE: TypeTag = TypeTag::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl OptionValue for i64 {
    const TYPE: TypeTag = TypeTag::Int;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl OptionValue for f64 {
    const TYPE: TypeTag = TypeTag::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl OptionValue for bool {
    const TYPE: TypeTag = TypeTag::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl OptionValue for Duration {
    const TYPE: TypeTag = TypeTag::Duration;

    fn into_value(self) -> Value {
        Value::Duration(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_duration()
    }
}

/// Failure to build typed options from a loaded schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("rejected setter: {0}")]
    Setter(#[from] SetterError),

    #[error("invalid options: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("sealed configuration has no {expected} field '{field}'")]
    Extract { field: String, expected: TypeTag },
}

impl OptionsError {
    pub fn code(&self) -> &'static str {
        match self {
            OptionsError::Setter(e) => e.code(),
            OptionsError::Validation(e) => e.code(),
            OptionsError::Extract { .. } => "OPT_EXTRACT_FAILED",
        }
    }

    /// Field errors, when the failure came from validation
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            OptionsError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// A typed struct readable from a sealed configuration.
pub trait TypedOptions: Sized {
    fn from_config(config: &Configuration) -> Result<Self, OptionsError>;
}

/// A successfully compiled schema for the typed options `T`.
///
/// The only way to obtain one is [`Compiled::compile`], so holding a
/// `Compiled` proves the declaration has no defects.
pub struct Compiled<T> {
    schema: Arc<OptionsSchema>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TypedOptions> Compiled<T> {
    pub fn compile(decl: &SchemaDecl) -> Result<Self, SchemaError> {
        Ok(Self {
            schema: Arc::new(decl.compile()?),
            _marker: PhantomData,
        })
    }

    pub fn schema(&self) -> &Arc<OptionsSchema> {
        &self.schema
    }

    /// Applies `setters` in order, validates, and reads the typed struct.
    pub fn build<I>(&self, setters: I) -> Result<T, OptionsError>
    where
        I: IntoIterator<Item = Setter>,
    {
        let config = Builder::with_setters(Arc::clone(&self.schema), setters)?.finalize()?;
        T::from_config(&config)
    }
}

impl<T> Clone for Compiled<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Compiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled").field("schema", &self.schema.name()).finish()
    }
}

/// Reads `field` out of a sealed configuration as `T`.
pub fn extract<T: OptionValue>(config: &Configuration, field: &str) -> Result<T, OptionsError> {
    config
        .get(field)
        .and_then(T::from_value)
        .ok_or_else(|| OptionsError::Extract {
            field: field.to_string(),
            expected: T::TYPE,
        })
}

/// Declares a typed options struct and its setter namespace.
///
/// Each field line is `name: Type = presence, "rules";` where presence is
/// `mandatory`, `default("literal")` or `optional`, and the rule expression
/// is optional. Supported types are `String`, `i64`, `f64`, `bool` and
/// `std::time::Duration`.
///
/// Generated items:
/// - the struct, with one `&Type` accessor per field
/// - `load()`, compiling the declaration once and caching the outcome
/// - a [`TypedOptions`] impl, so [`Compiled::build`] can produce the struct
/// - the setter namespace, with one constructor per field
#[macro_export]
macro_rules! options {
    (@decl $field:ident, $ty:ty, mandatory $(, $rules:literal)?) => {
        $crate::options!(@rules $crate::schema::FieldDecl::mandatory(
            stringify!($field),
            <$ty as $crate::typed::OptionValue>::TYPE,
        ) $(, $rules)?)
    };
    (@decl $field:ident, $ty:ty, default ($literal:literal) $(, $rules:literal)?) => {
        $crate::options!(@rules $crate::schema::FieldDecl::with_default(
            stringify!($field),
            <$ty as $crate::typed::OptionValue>::TYPE,
            $literal,
        ) $(, $rules)?)
    };
    (@decl $field:ident, $ty:ty, optional $(, $rules:literal)?) => {
        $crate::options!(@rules $crate::schema::FieldDecl::optional(
            stringify!($field),
            <$ty as $crate::typed::OptionValue>::TYPE,
        ) $(, $rules)?)
    };
    (@rules $decl:expr) => {
        $decl
    };
    (@rules $decl:expr, $rules:literal) => {
        $decl.validate($rules)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident, setters = $setters:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $presence:ident $( ( $literal:literal ) )? $(, $rules:literal)? ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $( $field: $ty, )*
        }

        #[allow(dead_code)]
        impl $name {
            /// Compiles the declaration. Call once at startup; the outcome
            /// is cached, so later calls return the same handle or defect.
            $vis fn load() -> ::core::result::Result<
                $crate::typed::Compiled<Self>,
                $crate::schema::SchemaError,
            > {
                static COMPILED: ::std::sync::OnceLock<
                    ::core::result::Result<
                        $crate::typed::Compiled<$name>,
                        $crate::schema::SchemaError,
                    >,
                > = ::std::sync::OnceLock::new();

                COMPILED
                    .get_or_init(|| {
                        $crate::typed::Compiled::compile(&$crate::schema::SchemaDecl::new(
                            stringify!($name),
                            ::std::vec![
                                $( $crate::options!(@decl $field, $ty, $presence $( ($literal) )? $(, $rules)?) ),*
                            ],
                        ))
                    })
                    .clone()
            }

            $(
                $vis fn $field(&self) -> &$ty {
                    &self.$field
                }
            )*
        }

        impl $crate::typed::TypedOptions for $name {
            fn from_config(
                config: &$crate::builder::Configuration,
            ) -> ::core::result::Result<Self, $crate::typed::OptionsError> {
                ::core::result::Result::Ok(Self {
                    $( $field: $crate::typed::extract::<$ty>(config, stringify!($field))?, )*
                })
            }
        }

        /// Setter constructors, one per field.
        $vis struct $setters;

        #[allow(dead_code)]
        impl $setters {
            $(
                $(#[$fmeta])*
                $vis fn $field(value: impl ::core::convert::Into<$ty>) -> $crate::builder::Setter {
                    $crate::builder::Setter::new(
                        stringify!($field),
                        $crate::typed::OptionValue::into_value(::core::convert::Into::<$ty>::into(value)),
                    )
                }
            )*
        }
    };
}
