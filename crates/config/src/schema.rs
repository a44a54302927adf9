//! Bridge configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims strings and drops trailing slashes from the base URL.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use storage_proxy_domain::{ObjectName, STORAGE_PROXY_OBJECT_NAME};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, redact_url_credentials};
use thiserror::Error;
use url::Url;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default remote API root.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:10000";

/// Default per-request timeout.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

const API_TIMEOUT_MIN_MS: u64 = 100;
const API_TIMEOUT_MAX_MS: u64 = 600_000;

/// Top-level bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BridgeConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Remote API settings.
    pub api: ApiConfig,
    /// Management registry settings.
    pub registry: RegistryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            api: ApiConfig::default(),
            registry: RegistryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedBridgeConfig, ConfigSchemaError> {
        self.validate_version()?;

        self.api.normalize();
        let base_url = self.api.validate()?;
        self.registry.normalize();
        let object_name = self.registry.validate()?;

        Ok(ValidatedBridgeConfig {
            raw: self,
            base_url,
            object_name,
        })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Validated config wrapper carrying parsed values.
#[derive(Debug, Clone)]
pub struct ValidatedBridgeConfig {
    raw: BridgeConfig,
    base_url: Url,
    object_name: ObjectName,
}

impl ValidatedBridgeConfig {
    /// Parsed API root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.raw.api.timeout_ms)
    }

    /// Registry name for the bridge.
    #[must_use]
    pub const fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &BridgeConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> BridgeConfig {
        self.raw
    }
}

impl std::ops::Deref for ValidatedBridgeConfig {
    type Target = BridgeConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiConfig {
    /// API root; resource paths are resolved against it.
    pub base_url: Box<str>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = trimmed.into();
    }

    fn validate(&self) -> Result<Url, ConfigSchemaError> {
        if !(API_TIMEOUT_MIN_MS..=API_TIMEOUT_MAX_MS).contains(&self.timeout_ms) {
            return Err(ConfigSchemaError::TimeoutOutOfRange {
                section: "api",
                field: "timeoutMs",
                value_ms: self.timeout_ms,
                min_ms: API_TIMEOUT_MIN_MS,
                max_ms: API_TIMEOUT_MAX_MS,
            });
        }

        let invalid = || ConfigSchemaError::InvalidUrl {
            section: "api",
            field: "baseUrl",
            url: self.base_url.to_string(),
        };
        let parsed = Url::parse(&self.base_url).map_err(|_| invalid())?;
        let http = matches!(parsed.scheme(), "http" | "https");
        if !http || parsed.cannot_be_a_base() || parsed.query().is_some() {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

/// Management registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RegistryConfig {
    /// Name the bridge is registered under.
    pub object_name: Box<str>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            object_name: STORAGE_PROXY_OBJECT_NAME.into(),
        }
    }
}

impl RegistryConfig {
    fn normalize(&mut self) {
        self.object_name = self.object_name.trim().into();
    }

    fn validate(&self) -> Result<ObjectName, ConfigSchemaError> {
        ObjectName::parse(&self.object_name).map_err(|error| {
            ConfigSchemaError::InvalidObjectName {
                section: "registry",
                field: "objectName",
                value: self.object_name.to_string(),
                reason: error.to_string(),
            }
        })
    }
}

/// Minimum level written by the JSON logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    /// Every attribute access.
    Debug,
    /// Startup and registration.
    #[default]
    Info,
    /// Failed accesses.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevelSetting {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a case-insensitive level name.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum level written.
    pub level: LogLevelSetting,
}

/// Parse a bridge config from a JSON string, applying validation and normalization.
pub fn parse_bridge_config_json(input: &str) -> Result<ValidatedBridgeConfig, ErrorEnvelope> {
    let config: BridgeConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a bridge config from a TOML string, applying validation and normalization.
pub fn parse_bridge_config_toml(input: &str) -> Result<ValidatedBridgeConfig, ErrorEnvelope> {
    let config: BridgeConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures for [`BridgeConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    #[error("unsupported config version: {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A timeout value is out of bounds.
    #[error("{section}.{field} must be within [{min_ms}, {max_ms}] ms (got {value_ms})")]
    TimeoutOutOfRange {
        /// Schema section (e.g. `api`).
        section: &'static str,
        /// Field name in the config file (e.g. `timeoutMs`).
        field: &'static str,
        /// Value provided (ms).
        value_ms: u64,
        /// Minimum allowed value (ms).
        min_ms: u64,
        /// Maximum allowed value (ms).
        max_ms: u64,
    },
    /// A URL entry is invalid.
    #[error("invalid URL for {section}.{field}")]
    InvalidUrl {
        /// Schema section (e.g. `api`).
        section: &'static str,
        /// Field name in the config file (e.g. `baseUrl`).
        field: &'static str,
        /// Invalid URL value.
        url: String,
    },
    /// A registry name is invalid.
    #[error("invalid object name for {section}.{field}: {reason}")]
    InvalidObjectName {
        /// Schema section (e.g. `registry`).
        section: &'static str,
        /// Field name in the config file (e.g. `objectName`).
        field: &'static str,
        /// Invalid value.
        value: String,
        /// Human readable reason.
        reason: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::TimeoutOutOfRange { .. } => ErrorCode::new("config", "invalid_timeout"),
            Self::InvalidUrl { .. } => ErrorCode::new("config", "invalid_url"),
            Self::InvalidObjectName { .. } => ErrorCode::new("config", "invalid_object_name"),
        }
    }
}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::TimeoutOutOfRange {
                section,
                field,
                value_ms,
                min_ms,
                max_ms,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value_ms", value_ms.to_string())
                .with_metadata("min_ms", min_ms.to_string())
                .with_metadata("max_ms", max_ms.to_string()),
            ConfigSchemaError::InvalidUrl {
                section,
                field,
                url,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("url", redact_url_credentials(&url)),
            ConfigSchemaError::InvalidObjectName {
                section,
                field,
                value,
                ..
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value),
        }
    }
}
