//! # storage-proxy-config
//!
//! Configuration schema, validation and loading for the storage-proxy bridge.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    BridgeEnv, ENV_API_BASE_URL, ENV_API_TIMEOUT_MS, ENV_LOG_LEVEL, ENV_REGISTRY_OBJECT_NAME,
    EnvParseError, apply_env_overrides,
};
pub use load::{
    load_bridge_config_from_path, load_bridge_config_from_sources, load_bridge_config_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use schema::{
    ApiConfig, BridgeConfig, CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_API_BASE_URL,
    DEFAULT_API_TIMEOUT_MS, LogLevelSetting, LoggingConfig, RegistryConfig,
    ValidatedBridgeConfig, parse_bridge_config_json, parse_bridge_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
