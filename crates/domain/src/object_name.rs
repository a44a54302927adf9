//! Validated management registry names (`domain:key=value[,key=value...]`).

use serde::{Deserialize, Serialize};
use std::fmt;
use storage_proxy_shared::{ErrorCode, ErrorEnvelope};

/// Validation failures for [`ObjectName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNameError {
    /// Input is empty after trimming.
    Empty,
    /// No `:` separating the domain from the key properties.
    MissingDomain {
        /// Trimmed input that failed validation.
        input: String,
    },
    /// A key property is not a non-empty `key=value` pair.
    InvalidProperty {
        /// Trimmed input that failed validation.
        input: String,
        /// Offending property text.
        property: String,
    },
    /// The same key appears twice.
    DuplicateKey {
        /// Trimmed input that failed validation.
        input: String,
        /// Repeated key.
        key: String,
    },
}

impl fmt::Display for ObjectNameError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("object name must be non-empty"),
            Self::MissingDomain { .. } => {
                formatter.write_str("object name must have the form domain:key=value")
            },
            Self::InvalidProperty { property, .. } => {
                write!(formatter, "object name property `{property}` is not key=value")
            },
            Self::DuplicateKey { key, .. } => {
                write!(formatter, "object name repeats key `{key}`")
            },
        }
    }
}

impl std::error::Error for ObjectNameError {}

impl From<ObjectNameError> for ErrorEnvelope {
    fn from(error: ObjectNameError) -> Self {
        let envelope = Self::expected(ErrorCode::invalid_input(), error.to_string());
        match error {
            ObjectNameError::Empty => envelope,
            ObjectNameError::MissingDomain { input } => envelope.with_metadata("input", input),
            ObjectNameError::InvalidProperty { input, property } => envelope
                .with_metadata("input", input)
                .with_metadata("property", property),
            ObjectNameError::DuplicateKey { input, key } => {
                envelope.with_metadata("input", input).with_metadata("key", key)
            },
        }
    }
}

/// Name under which a managed bean is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName(Box<str>);

impl ObjectName {
    /// Parse and validate an object name.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, ObjectNameError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ObjectNameError::Empty);
        }

        let Some((domain, properties)) = trimmed.split_once(':') else {
            return Err(ObjectNameError::MissingDomain {
                input: trimmed.to_owned(),
            });
        };
        if domain.is_empty() || properties.is_empty() {
            return Err(ObjectNameError::MissingDomain {
                input: trimmed.to_owned(),
            });
        }

        let mut keys: Vec<&str> = Vec::new();
        for property in properties.split(',') {
            let pair = property
                .split_once('=')
                .filter(|(key, value)| !key.is_empty() && !value.is_empty());
            let Some((key, _)) = pair else {
                return Err(ObjectNameError::InvalidProperty {
                    input: trimmed.to_owned(),
                    property: property.to_owned(),
                });
            };
            if keys.contains(&key) {
                return Err(ObjectNameError::DuplicateKey {
                    input: trimmed.to_owned(),
                    key: key.to_owned(),
                });
            }
            keys.push(key);
        }

        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Portion before the first `:`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once(':').map_or("", |(domain, _)| domain)
    }

    /// Value of a key property, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        let (_, properties) = self.0.split_once(':')?;
        properties
            .split(',')
            .filter_map(|property| property.split_once('='))
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value)
    }
}

impl AsRef<str> for ObjectName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<String> for ObjectName {
    type Error = ObjectNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ObjectName> for String {
    fn from(value: ObjectName) -> Self {
        value.0.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STORAGE_PROXY_OBJECT_NAME;

    #[test]
    fn parses_the_storage_proxy_name() -> Result<(), ObjectNameError> {
        let name = ObjectName::parse(STORAGE_PROXY_OBJECT_NAME)?;
        assert_eq!(name.domain(), "org.apache.cassandra.db");
        assert_eq!(name.property("type"), Some("StorageProxy"));
        assert_eq!(name.property("scope"), None);
        assert_eq!(name.as_str(), STORAGE_PROXY_OBJECT_NAME);
        Ok(())
    }

    #[test]
    fn trims_and_accepts_multiple_properties() -> Result<(), ObjectNameError> {
        let name = ObjectName::parse("  metrics:type=ClientRequest,scope=Read ")?;
        assert_eq!(name.property("scope"), Some("Read"));
        assert_eq!(name.to_string(), "metrics:type=ClientRequest,scope=Read");
        Ok(())
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(ObjectName::parse("   "), Err(ObjectNameError::Empty));
        assert!(matches!(
            ObjectName::parse("StorageProxy"),
            Err(ObjectNameError::MissingDomain { .. })
        ));
        assert!(matches!(
            ObjectName::parse(":type=StorageProxy"),
            Err(ObjectNameError::MissingDomain { .. })
        ));
        assert!(matches!(
            ObjectName::parse("db:type"),
            Err(ObjectNameError::InvalidProperty { .. })
        ));
        assert!(matches!(
            ObjectName::parse("db:type=a,type=b"),
            Err(ObjectNameError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn errors_convert_to_invalid_input() {
        let envelope: ErrorEnvelope = ObjectNameError::DuplicateKey {
            input: "db:type=a,type=b".to_owned(),
            key: "type".to_owned(),
        }
        .into();
        assert_eq!(envelope.code, ErrorCode::invalid_input());
        assert_eq!(envelope.metadata.get("key").map(String::as_str), Some("type"));
    }

    #[test]
    fn deserializes_through_validation() {
        let parsed: Result<ObjectName, _> = serde_json::from_str("\"db:type=StorageProxy\"");
        assert!(parsed.is_ok());
        let rejected: Result<ObjectName, _> = serde_json::from_str("\"nope\"");
        assert!(rejected.is_err());
    }
}
