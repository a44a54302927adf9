//! Attribute value types and their wire encoding.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result};

/// Semantic type of an attribute, used both as the decode rule for remote
/// reads and as the validation rule for writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    /// `true` / `false`.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Floating point (decayed latency estimates).
    Double,
    /// Free-form string.
    String,
    /// Set of strings.
    StringSet,
    /// Map of string to ordered list of strings.
    StringListMap,
    /// Histogram bucket counts.
    Histogram,
}

impl ValueType {
    /// Stable lowercase name used in logs and error metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::StringSet => "set<string>",
            Self::StringListMap => "map<string,list<string>>",
            Self::Histogram => "long[]",
        }
    }

    /// Whether values of this type can be sent as a single query parameter.
    #[must_use]
    pub const fn is_scalar_param(self) -> bool {
        matches!(self, Self::Boolean | Self::Int | Self::Long | Self::String)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value.
    Boolean(bool),
    /// 32-bit integer value.
    Int(i32),
    /// 64-bit integer value.
    Long(i64),
    /// Floating point value.
    Double(f64),
    /// String value.
    String(String),
    /// Set of strings (sorted).
    StringSet(BTreeSet<String>),
    /// Map of string to ordered list of strings (sorted by key).
    StringListMap(BTreeMap<String, Vec<String>>),
    /// Histogram bucket counts.
    Histogram(Vec<u64>),
}

impl AttributeValue {
    /// The semantic type of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Boolean(_) => ValueType::Boolean,
            Self::Int(_) => ValueType::Int,
            Self::Long(_) => ValueType::Long,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::StringSet(_) => ValueType::StringSet,
            Self::StringListMap(_) => ValueType::StringListMap,
            Self::Histogram(_) => ValueType::Histogram,
        }
    }

    /// Canonical query-parameter form: `true`/`false` for booleans, decimal
    /// for integers, the string itself for strings. Collections have none.
    #[must_use]
    pub fn to_param(&self) -> Option<String> {
        match self {
            Self::Boolean(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Long(value) => Some(value.to_string()),
            Self::String(value) => Some(value.clone()),
            Self::Double(_) | Self::StringSet(_) | Self::StringListMap(_) | Self::Histogram(_) => {
                None
            },
        }
    }

    /// Unwrap a boolean.
    pub fn into_boolean(self) -> Result<bool> {
        match self {
            Self::Boolean(value) => Ok(value),
            other => Err(type_mismatch(ValueType::Boolean, &other)),
        }
    }

    /// Unwrap an int.
    pub fn into_int(self) -> Result<i32> {
        match self {
            Self::Int(value) => Ok(value),
            other => Err(type_mismatch(ValueType::Int, &other)),
        }
    }

    /// Unwrap a long.
    pub fn into_long(self) -> Result<i64> {
        match self {
            Self::Long(value) => Ok(value),
            other => Err(type_mismatch(ValueType::Long, &other)),
        }
    }

    /// Unwrap a double.
    pub fn into_double(self) -> Result<f64> {
        match self {
            Self::Double(value) => Ok(value),
            other => Err(type_mismatch(ValueType::Double, &other)),
        }
    }

    /// Unwrap a set of strings.
    pub fn into_string_set(self) -> Result<BTreeSet<String>> {
        match self {
            Self::StringSet(value) => Ok(value),
            other => Err(type_mismatch(ValueType::StringSet, &other)),
        }
    }

    /// Unwrap a map of string lists.
    pub fn into_string_list_map(self) -> Result<BTreeMap<String, Vec<String>>> {
        match self {
            Self::StringListMap(value) => Ok(value),
            other => Err(type_mismatch(ValueType::StringListMap, &other)),
        }
    }

    /// Unwrap histogram buckets.
    pub fn into_histogram(self) -> Result<Vec<u64>> {
        match self {
            Self::Histogram(value) => Ok(value),
            other => Err(type_mismatch(ValueType::Histogram, &other)),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

fn type_mismatch(expected: ValueType, actual: &AttributeValue) -> ErrorEnvelope {
    ErrorEnvelope::invariant(
        ErrorCode::internal(),
        format!(
            "attribute value type mismatch (expected {expected}, got {})",
            actual.value_type()
        ),
    )
    .with_metadata("expected", expected.as_str())
    .with_metadata("actual", actual.value_type().as_str())
}
