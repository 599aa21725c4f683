//! The schema capability: the seam between the pipeline and whatever
//! type-checks a field mapping into a typed object.
//!
//! The pipeline only ever talks to the [`Schema`] trait. [`TypedSchema`] is
//! the bundled implementation: declared fields are shape-checked (presence,
//! unknown keys, scalar kinds, optional coercion) with one error collected
//! per offending field, then the shaped mapping is deserialized with `serde`
//! and value-level rules run through the `validator` crate.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sluice::{FieldKind, TypedSchema};
//! use validator::Validate;
//!
//! #[derive(Debug, Serialize, Deserialize, Validate)]
//! struct CreateUser {
//!     username: String,
//!     age: i64,
//!     #[validate(email)]
//!     email: String,
//! }
//!
//! let schema = TypedSchema::<CreateUser>::new()
//!     .field("username", FieldKind::String)
//!     .field("age", FieldKind::Integer)
//!     .field("email", FieldKind::String);
//! ```

use crate::error::FieldError;
use crate::extract::RawData;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use validator::Validate;

/// The two booleans a [`crate::ValidationMode`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Reject fields not declared by the schema instead of ignoring them.
    pub reject_unknown: bool,
    /// Attempt unambiguous type coercion instead of requiring exact types.
    pub coerce: bool,
}

/// Validates and coerces a raw field mapping into a typed object.
///
/// Injected into the pipeline; implementations own all knowledge of field
/// types. On failure they return one [`FieldError`] per offending field, in
/// detection order.
pub trait Schema: Send + Sync {
    type Output;

    fn validate(&self, raw: &RawData, opts: SchemaOptions) -> Result<Self::Output, Vec<FieldError>>;
}

/// Scalar kind a declared field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Object,
    /// Accept any JSON value unchanged.
    Any,
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

/// Field-declaring schema over any `serde`-deserializable, `validator`-checked
/// type.
pub struct TypedSchema<T> {
    fields: Vec<FieldSpec>,
    _output: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            _output: PhantomData,
        }
    }

    /// Declare a required field.
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
        });
        self
    }

    /// Declare an optional field. Absent optional fields are left to the
    /// output type's own defaults.
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
        });
        self
    }

    fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Validate + Send + Sync,
{
    type Output = T;

    fn validate(&self, raw: &RawData, opts: SchemaOptions) -> Result<T, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut shaped = RawData::new();

        if opts.reject_unknown {
            for key in raw.keys() {
                if !self.declares(key) {
                    errors.push(FieldError::new(key, "unknown field is not permitted"));
                }
            }
        }

        for field in &self.fields {
            let value = match raw.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        errors.push(FieldError::new(field.name, "field required"));
                    }
                    continue;
                }
                Some(value) => value,
            };

            match conform(value, field.kind, opts.coerce) {
                Ok(value) => {
                    shaped.insert(field.name.to_string(), value);
                }
                Err(message) => errors.push(FieldError::new(field.name, message)),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let output: T = serde_json::from_value(Value::Object(shaped))
            .map_err(|e| vec![FieldError::new("body", e.to_string())])?;

        if let Err(failures) = output.validate() {
            let mut errors = Vec::new();
            for (field, field_errors) in failures.field_errors() {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    errors.push(FieldError::new(field.to_string(), message));
                }
            }
            return Err(errors);
        }

        Ok(output)
    }
}

/// Check a value against a declared kind, coercing when allowed.
///
/// Coercions are deliberately narrow: numeric strings to numbers,
/// "true"/"false"/"1"/"0" to booleans, scalars to their string form, and a
/// lone scalar to a single-element list. Anything ambiguous stays an error.
fn conform(value: &Value, kind: FieldKind, coerce: bool) -> Result<Value, String> {
    match kind {
        FieldKind::Any => Ok(value.clone()),
        FieldKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) if coerce => Ok(Value::String(n.to_string())),
            Value::Bool(b) if coerce => Ok(Value::String(b.to_string())),
            _ => Err("expected a string".into()),
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) if coerce => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| "expected an integer".to_string()),
            _ => Err("expected an integer".into()),
        },
        FieldKind::Float => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) if coerce => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "expected a number".to_string()),
            _ => Err("expected a number".into()),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if coerce => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err("expected a boolean".into()),
            },
            _ => Err("expected a boolean".into()),
        },
        FieldKind::List => match value {
            Value::Array(_) => Ok(value.clone()),
            Value::Object(_) => Err("expected a list".into()),
            _ if coerce => Ok(Value::Array(vec![value.clone()])),
            _ => Err("expected a list".into()),
        },
        FieldKind::Object => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err("expected an object".into()),
        },
    }
}
