//! Remote metrics/configuration API boundary contract.

use std::collections::{BTreeMap, BTreeSet};
use storage_proxy_domain::{AttributeValue, ValueType};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result};

/// Query parameters for a remote POST, in send order.
pub type RemoteParams = Vec<(Box<str>, Box<str>)>;

/// Build a single-entry parameter list.
#[must_use]
pub fn single_param(name: &str, value: impl Into<Box<str>>) -> RemoteParams {
    vec![(name.into(), value.into())]
}

/// Boundary contract for the remote API.
///
/// Paths are relative to the API root (e.g. `storage_proxy/total_hints`).
/// The decode rule is chosen by the caller, never discovered from the
/// payload. Failures are `remote:transport` or `remote:decode`.
pub trait RemoteClientPort: Send + Sync {
    /// GET a boolean.
    fn get_boolean(&self, path: &str) -> Result<bool>;

    /// GET a 32-bit integer.
    fn get_int(&self, path: &str) -> Result<i32>;

    /// GET a 64-bit integer.
    fn get_long(&self, path: &str) -> Result<i64>;

    /// GET a set of strings.
    fn get_string_set(&self, path: &str) -> Result<BTreeSet<String>>;

    /// GET a map of string to list of strings.
    fn get_string_list_map(&self, path: &str) -> Result<BTreeMap<String, Vec<String>>>;

    /// POST with query parameters and an empty body.
    fn post(&self, path: &str, params: RemoteParams) -> Result<()>;

    /// GET and decode according to `value_type`.
    fn get_value(&self, path: &str, value_type: ValueType) -> Result<AttributeValue> {
        match value_type {
            ValueType::Boolean => self.get_boolean(path).map(AttributeValue::Boolean),
            ValueType::Int => self.get_int(path).map(AttributeValue::Int),
            ValueType::Long => self.get_long(path).map(AttributeValue::Long),
            ValueType::StringSet => self.get_string_set(path).map(AttributeValue::StringSet),
            ValueType::StringListMap => self
                .get_string_list_map(path)
                .map(AttributeValue::StringListMap),
            ValueType::Double | ValueType::String | ValueType::Histogram => Err(
                ErrorEnvelope::expected(
                    ErrorCode::unsupported(),
                    format!("remote reads of {value_type} values are not supported"),
                )
                .with_metadata("path", path),
            ),
        }
    }
}
