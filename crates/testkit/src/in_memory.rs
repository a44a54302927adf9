//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests
//! - Deterministic contract tests for the ports layer
//! - Driving the bridge without a running remote API

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use storage_proxy_domain::ObjectName;
use storage_proxy_ports::{
    LogEvent, LogFields, LoggerPort, ManagedBean, ManagementRegistryPort, RemoteClientPort,
    RemoteParams,
};
use storage_proxy_shared::{ErrorClass, ErrorEnvelope, Result};

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// Logger capturing events for assertions. Children share the capture buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl RecordingLogger {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured events, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().expect("recording logger lock").clone()
    }

    /// Captured event names, oldest first.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event.into_string())
            .collect()
    }

    /// Drop captured events.
    pub fn clear(&self) {
        self.events.lock().expect("recording logger lock").clear();
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        self.events.lock().expect("recording logger lock").push(event);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields,
        })
    }
}

/// A POST observed by [`InMemoryRemoteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    /// Path relative to the API root.
    pub path: String,
    /// Query parameters, in send order.
    pub params: RemoteParams,
}

#[derive(Debug, Default)]
struct RemoteState {
    values: BTreeMap<String, Value>,
    gets: Vec<String>,
    posts: Vec<RecordedPost>,
    failure: Option<ErrorEnvelope>,
}

/// Stub remote API keeping JSON values by path.
///
/// Reads decode the stored value with the caller's type, the same way the
/// HTTP adapter decodes a response body. A POST stores its single parameter
/// under the path so a later GET observes the write.
#[derive(Debug, Default)]
pub struct InMemoryRemoteClient {
    state: Mutex<RemoteState>,
}

impl InMemoryRemoteClient {
    /// Create an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a value.
    #[must_use]
    pub fn with_value(self, path: &str, value: Value) -> Self {
        self.set_value(path, value);
        self
    }

    /// Seed or replace a value.
    pub fn set_value(&self, path: &str, value: Value) {
        self.lock().values.insert(path.to_string(), value);
    }

    /// Current value at `path`.
    pub fn value(&self, path: &str) -> Option<Value> {
        self.lock().values.get(path).cloned()
    }

    /// Make every subsequent call fail with `error` (or succeed again on `None`).
    pub fn fail_with(&self, error: Option<ErrorEnvelope>) {
        self.lock().failure = error;
    }

    /// Paths read so far, oldest first.
    pub fn gets(&self) -> Vec<String> {
        self.lock().gets.clone()
    }

    /// Writes seen so far, oldest first.
    pub fn posts(&self) -> Vec<RecordedPost> {
        self.lock().posts.clone()
    }

    /// Total calls (reads and writes).
    pub fn call_count(&self) -> usize {
        let state = self.lock();
        state.gets.len() + state.posts.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RemoteState> {
        self.state.lock().expect("remote stub lock")
    }

    fn read<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut state = self.lock();
        state.gets.push(path.to_string());
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        let value = state.values.get(path).cloned().ok_or_else(|| {
            ErrorEnvelope::transport(
                format!("remote API returned 404 Not Found for {path}"),
                ErrorClass::NonRetriable,
            )
            .with_metadata("path", path)
            .with_metadata("status", "404")
        })?;
        drop(state);

        serde_json::from_value(value).map_err(|error| {
            ErrorEnvelope::decode(format!("failed to decode response from {path}: {error}"))
                .with_metadata("path", path)
        })
    }
}

impl RemoteClientPort for InMemoryRemoteClient {
    fn get_boolean(&self, path: &str) -> Result<bool> {
        self.read(path)
    }

    fn get_int(&self, path: &str) -> Result<i32> {
        self.read(path)
    }

    fn get_long(&self, path: &str) -> Result<i64> {
        self.read(path)
    }

    fn get_string_set(&self, path: &str) -> Result<BTreeSet<String>> {
        self.read(path)
    }

    fn get_string_list_map(&self, path: &str) -> Result<BTreeMap<String, Vec<String>>> {
        self.read(path)
    }

    fn post(&self, path: &str, params: RemoteParams) -> Result<()> {
        let mut state = self.lock();
        state.posts.push(RecordedPost {
            path: path.to_string(),
            params: params.clone(),
        });
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        if let [(_, raw)] = params.as_slice() {
            let stored: Value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::from(&**raw));
            state.values.insert(path.to_string(), stored);
        }
        Ok(())
    }
}

/// Registry recording what was registered, optionally refusing everything.
#[derive(Default)]
pub struct RecordingRegistry {
    registered: Mutex<Vec<(ObjectName, Arc<dyn ManagedBean>)>>,
    refusal: Option<ErrorEnvelope>,
}

impl RecordingRegistry {
    /// Accept every registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every registration with `error`.
    pub fn refusing(error: ErrorEnvelope) -> Self {
        Self {
            registered: Mutex::default(),
            refusal: Some(error),
        }
    }

    /// Names registered so far, in order.
    pub fn registered_names(&self) -> Vec<ObjectName> {
        self.registered
            .lock()
            .expect("registry lock")
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Bean registered under `name`, if any.
    pub fn bean(&self, name: &ObjectName) -> Option<Arc<dyn ManagedBean>> {
        self.registered
            .lock()
            .expect("registry lock")
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, bean)| Arc::clone(bean))
    }
}

impl ManagementRegistryPort for RecordingRegistry {
    fn register(&self, name: &ObjectName, bean: Arc<dyn ManagedBean>) -> Result<()> {
        if let Some(error) = &self.refusal {
            return Err(error.clone());
        }
        self.registered
            .lock()
            .expect("registry lock")
            .push((name.clone(), bean));
        Ok(())
    }
}
