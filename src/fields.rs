//! Declarative field rules and the routine that applies them.
//!
//! Every request is described by an ordered table of [`FieldSpec`] entries.
//! [`validate`] walks the table once and, for each entry, checks presence,
//! then type, then length and allowed values. Absent optional fields receive
//! their default. The first failing field aborts validation.

use crate::error::{GatewayError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Caller-supplied field values, by field name.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// A value supplied by the caller for one field.
///
/// JSON cannot carry NaN or infinity, and `serde_json` turns such floats into
/// `null`. They are kept apart here so a supplied value never reads as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Any value JSON can represent.
    Json(Value),
    /// A NaN or infinite float.
    NonFinite(f64),
}

macro_rules! from_json {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Json(Value::from(value))
                }
            }
        )*
    };
}

from_json!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    String,
    &str,
    Map<String, Value>,
    Vec<Value>
);

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            FieldValue::Json(Value::from(value))
        } else {
            FieldValue::NonFinite(value)
        }
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::from(f64::from(value))
    }
}

/// Type class a field value must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON integer (signed or unsigned).
    Integer,
    /// Any JSON number, integer or floating point.
    Number,
    /// JSON string.
    String,
}

impl FieldKind {
    /// Name reported in type errors.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Integer => "int",
            FieldKind::Number => "float",
            FieldKind::String => "str",
        }
    }

    /// Returns `true` if `value` belongs to this type class.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::String => value.is_string(),
        }
    }
}

/// Validation rule for one request field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Name the caller supplies the field under.
    pub name: &'static str,
    /// Key the field is sent under.
    pub key: &'static str,
    /// Whether an absent value is an error rather than defaulted.
    pub required: bool,
    /// Type class the value must belong to.
    pub kind: FieldKind,
    /// Maximum length in characters, for string fields.
    pub max_len: Option<usize>,
    /// Closed set of accepted string values.
    pub allowed: Option<&'static [&'static str]>,
    /// Value substituted when an optional field is absent.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// A mandatory field sent under its own name.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            key: name,
            required: true,
            kind,
            max_len: None,
            allowed: None,
            default: None,
        }
    }

    /// An optional string field defaulting to `default`.
    pub const fn optional(name: &'static str, default: &'static str) -> Self {
        FieldSpec {
            name,
            key: name,
            required: false,
            kind: FieldKind::String,
            max_len: None,
            allowed: None,
            default: Some(default),
        }
    }

    /// Limits a string value to `max` characters.
    pub const fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Restricts a string value to `values`.
    pub const fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    /// Sends the field under `key` instead of its name.
    pub const fn sent_as(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Checks a single value against this rule.
    ///
    /// Returns the value to send, or `None` when the field is absent and has
    /// no default. A non-finite float is a type error for every kind, since
    /// it has no JSON form.
    pub fn check(&self, value: Option<&FieldValue>) -> Result<Option<Value>> {
        let value = match value {
            Some(FieldValue::Json(Value::Null)) | None => {
                if self.required {
                    return Err(GatewayError::MissingField { field: self.name });
                }
                return Ok(self.default.map(|d| Value::String(d.to_string())));
            }
            Some(FieldValue::NonFinite(_)) => return Err(self.wrong_type()),
            Some(FieldValue::Json(value)) => value,
        };

        if !self.kind.accepts(value) {
            return Err(self.wrong_type());
        }

        if let Value::String(s) = value {
            if let Some(max) = self.max_len {
                if s.chars().count() > max {
                    return Err(GatewayError::TooLong {
                        field: self.name,
                        max,
                    });
                }
            }
            if let Some(allowed) = self.allowed {
                if !allowed.contains(&s.as_str()) {
                    return Err(GatewayError::InvalidValue {
                        field: self.name,
                        allowed,
                    });
                }
            }
        }

        Ok(Some(value.clone()))
    }

    fn wrong_type(&self) -> GatewayError {
        GatewayError::WrongType {
            field: self.name,
            expected: self.kind.name(),
        }
    }
}

/// Validates `input` against `specs`, in table order.
///
/// The result holds one entry per spec (keyed by [`FieldSpec::key`]) in the
/// same order. Input keys not named by any spec are ignored.
pub fn validate(specs: &[FieldSpec], input: &FieldValues) -> Result<Map<String, Value>> {
    let mut output = Map::new();
    for spec in specs {
        if let Some(value) = spec.check(input.get(spec.name))? {
            output.insert(spec.key.to_string(), value);
        }
    }
    Ok(output)
}
