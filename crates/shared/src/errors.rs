//! Error envelope shared by every bridge crate.
//!
//! Every failure surfaced by the bridge is an [`ErrorEnvelope`]: a kind, a
//! retry class, a namespaced code and a message. Remote transport, remote
//! decode and registry failures each have a dedicated code so management
//! consumers can tell them apart without parsing messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sorted diagnostic metadata.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Origin of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected failures (validation, unknown names, unsupported attributes).
    Expected,
    /// Broken domain assumptions.
    Invariant,
    /// Unexpected failures (I/O, remote backend, registry).
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => formatter.write_str("expected"),
            Self::Invariant => formatter.write_str("invariant"),
            Self::Unexpected => formatter.write_str("unexpected"),
        }
    }
}

/// Whether a caller may reasonably repeat the failed call.
///
/// The bridge itself never retries; the class is informational for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Transient: connect failures, timeouts, 5xx.
    Retriable,
    /// Repeating the call yields the same failure.
    NonRetriable,
}

impl ErrorClass {
    /// `true` for [`ErrorClass::Retriable`].
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        matches!(self, Self::Retriable)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retriable => formatter.write_str("retriable"),
            Self::NonRetriable => formatter.write_str("non-retriable"),
        }
    }
}

/// Namespaced code such as `remote:transport`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Build a code from its two halves.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// Invalid input code.
    pub fn invalid_input() -> Self {
        Self::new("core", "invalid_input")
    }

    /// Not found code (unknown attribute, operation or registered name).
    pub fn not_found() -> Self {
        Self::new("core", "not_found")
    }

    /// Attribute exists but has no working implementation.
    pub fn unsupported() -> Self {
        Self::new("core", "unsupported")
    }

    /// Bridge-internal failure (client construction, serialization).
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }

    /// The remote call could not complete.
    pub fn transport() -> Self {
        Self::new("remote", "transport")
    }

    /// The remote response did not match the declared value type.
    pub fn decode() -> Self {
        Self::new("remote", "decode")
    }

    /// The bridge could not be registered with the management registry.
    pub fn registration() -> Self {
        Self::new("registry", "registration")
    }

    /// `remote` in `remote:transport`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `transport` in `remote:transport`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Failure value returned by every fallible bridge API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Where the failure came from.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Message for operators.
    pub message: String,
    /// Diagnostic key/value pairs (path, status, attribute).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    fn build(kind: ErrorKind, class: ErrorClass, code: ErrorCode, message: String) -> Self {
        Self {
            kind,
            class,
            code,
            message,
            metadata: ErrorMetadata::new(),
        }
    }

    /// Caller-side failure: bad name, bad value, unsupported attribute.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Expected, ErrorClass::NonRetriable, code, message.into())
    }

    /// Broken internal assumption; never retriable.
    pub fn invariant(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Invariant, ErrorClass::NonRetriable, code, message.into())
    }

    /// Failure outside the caller's control, tagged with a retry class.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self::build(ErrorKind::Unexpected, class, code, message.into())
    }

    /// Remote transport failure (connection, timeout, non-success status).
    pub fn transport(message: impl Into<String>, class: ErrorClass) -> Self {
        Self::unexpected(ErrorCode::transport(), message, class)
    }

    /// Remote payload did not decode to the declared type.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::unexpected(ErrorCode::decode(), message, ErrorClass::NonRetriable)
    }

    /// Registry refused the bridge.
    pub fn registration(message: impl Into<String>) -> Self {
        Self::unexpected(
            ErrorCode::registration(),
            message,
            ErrorClass::NonRetriable,
        )
    }

    /// Returns true when the error carries the given code.
    #[must_use]
    pub fn has_code(&self, code: &ErrorCode) -> bool {
        &self.code == code
    }

    /// Add or replace one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind, self.class, self.code, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {}
