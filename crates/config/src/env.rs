//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or malformed
//! fails fast instead of silently falling back to the file value.

use crate::schema::{BridgeConfig, LogLevelSetting, ValidatedBridgeConfig};
use std::collections::BTreeMap;
use storage_proxy_shared::{
    ErrorCode, ErrorEnvelope, REDACTED, is_secret_key, redact_url_credentials,
};
use thiserror::Error;
use url::Url;

/// Env var: remote API root.
pub const ENV_API_BASE_URL: &str = "SPB_API_BASE_URL";
/// Env var: remote API timeout in milliseconds.
pub const ENV_API_TIMEOUT_MS: &str = "SPB_API_TIMEOUT_MS";
/// Env var: registry object name.
pub const ENV_REGISTRY_OBJECT_NAME: &str = "SPB_REGISTRY_OBJECT_NAME";
/// Env var: minimum log level.
pub const ENV_LOG_LEVEL: &str = "SPB_LOG_LEVEL";

const ALL_VARS: [&str; 4] = [
    ENV_API_BASE_URL,
    ENV_API_TIMEOUT_MS,
    ENV_REGISTRY_OBJECT_NAME,
    ENV_LOG_LEVEL,
];

/// Typed env-derived overrides for [`BridgeConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeEnv {
    /// Override for `api.baseUrl`.
    pub api_base_url: Option<Box<str>>,
    /// Override for `api.timeoutMs`.
    pub api_timeout_ms: Option<u64>,
    /// Override for `registry.objectName`.
    pub registry_object_name: Option<Box<str>>,
    /// Override for `logging.level`.
    pub log_level: Option<LogLevelSetting>,
}

impl BridgeEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            api_base_url: parse_optional_url(map, ENV_API_BASE_URL)?,
            api_timeout_ms: parse_optional_u64(map, ENV_API_TIMEOUT_MS)?,
            registry_object_name: parse_optional_trimmed_string(map, ENV_REGISTRY_OBJECT_NAME)?,
            log_level: parse_optional_log_level(map, ENV_LOG_LEVEL)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.api_base_url.is_none()
            && self.api_timeout_ms.is_none()
            && self.registry_object_name.is_none()
            && self.log_level.is_none()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: BridgeConfig,
    env: &BridgeEnv,
) -> Result<ValidatedBridgeConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(base_url) = &env.api_base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = env.api_timeout_ms {
        config.api.timeout_ms = timeout_ms;
    }
    if let Some(object_name) = &env.registry_object_name {
        config.registry.object_name.clone_from(object_name);
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    #[error("{var} must be non-empty")]
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Integer env var had an invalid value.
    #[error("{var} must be an integer")]
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// URL env var had an invalid value.
    #[error("{var} must be a valid URL")]
    InvalidUrl {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    #[error("{var} has an unsupported value")]
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidUrl { .. } => ErrorCode::new("config", "invalid_env_url"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidUrl { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_url_credentials(&value)),
            EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_value(var, &value)),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.into()))
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.into_string(),
        })
}

fn parse_optional_url(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    match Url::parse(&trimmed) {
        Ok(_) => Ok(Some(trimmed)),
        Err(_) => Err(EnvParseError::InvalidUrl {
            var,
            value: trimmed.into_string(),
        }),
    }
}

fn parse_optional_log_level(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogLevelSetting>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };

    LogLevelSetting::parse(&trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.into_string(),
        })
}

fn redact_value(var: &str, value: &str) -> String {
    if is_secret_key(var) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
