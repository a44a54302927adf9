//! Logger wiring from config.

use std::sync::Arc;
use storage_proxy_adapters::{JsonLogger, LogSink};
use storage_proxy_config::{LogLevelSetting, ValidatedBridgeConfig};
use storage_proxy_ports::{LogFields, LogLevel, LoggerPort};

/// Map the configured level onto the logger port's level.
#[must_use]
pub const fn log_level(setting: LogLevelSetting) -> LogLevel {
    match setting {
        LogLevelSetting::Debug => LogLevel::Debug,
        LogLevelSetting::Info => LogLevel::Info,
        LogLevelSetting::Warn => LogLevel::Warn,
        LogLevelSetting::Error => LogLevel::Error,
    }
}

/// JSON logger writing to `sink`, tagged with the bean's object name.
pub fn build_logger(config: &ValidatedBridgeConfig, sink: Arc<dyn LogSink>) -> Arc<dyn LoggerPort> {
    let mut base_fields = LogFields::new();
    base_fields.insert(
        "objectName".to_owned().into_boxed_str(),
        serde_json::Value::String(config.object_name().to_string()),
    );

    Arc::new(
        JsonLogger::new(sink)
            .with_base_fields(base_fields)
            .with_min_level(log_level(config.logging.level)),
    )
}
