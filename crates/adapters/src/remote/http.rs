//! Blocking HTTP client for the remote metrics-and-configuration API.
//!
//! Every read is a GET on `{base_url}/{path}` returning a JSON body. Every
//! write is a POST on the same URL with the value in the query string and
//! an empty body.

use super::decode::{decode_json, decode_string_list_map, decode_string_set};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use storage_proxy_config::ValidatedBridgeConfig;
use storage_proxy_ports::{RemoteClientPort, RemoteParams};
use storage_proxy_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result, redact_url_credentials};
use url::Url;

/// Connection settings for [`HttpRemoteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRemoteClientConfig {
    /// API root. May carry a path prefix (e.g. `http://host:10000/api`).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRemoteClientConfig {
    /// Derive client settings from a validated bridge config.
    #[must_use]
    pub fn from_validated(config: &ValidatedBridgeConfig) -> Self {
        Self {
            base_url: config.base_url().clone(),
            timeout: config.timeout(),
        }
    }
}

/// [`RemoteClientPort`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: Url,
}

impl HttpRemoteClient {
    /// Build a client with the configured timeout.
    pub fn new(config: HttpRemoteClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::internal(),
                    format!("failed to build remote API client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// The API root requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` below the API root, keeping any prefix the root carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    "remote API base URL cannot carry a path",
                )
                .with_metadata("baseUrl", redact_url_credentials(self.base_url.as_str()))
            })?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|segment| !segment.is_empty()) {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path)?;
        tracing::debug!(path, "GET remote attribute");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|error| map_reqwest_error(path, &error))?;
        let response = ensure_success(path, response)?;
        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|error| map_reqwest_error(path, &error))
    }
}

impl RemoteClientPort for HttpRemoteClient {
    fn get_boolean(&self, path: &str) -> Result<bool> {
        decode_json(path, &self.get_bytes(path)?)
    }

    fn get_int(&self, path: &str) -> Result<i32> {
        decode_json(path, &self.get_bytes(path)?)
    }

    fn get_long(&self, path: &str) -> Result<i64> {
        decode_json(path, &self.get_bytes(path)?)
    }

    fn get_string_set(&self, path: &str) -> Result<BTreeSet<String>> {
        decode_string_set(path, &self.get_bytes(path)?)
    }

    fn get_string_list_map(&self, path: &str) -> Result<BTreeMap<String, Vec<String>>> {
        decode_string_list_map(path, &self.get_bytes(path)?)
    }

    fn post(&self, path: &str, params: RemoteParams) -> Result<()> {
        let mut url = self.endpoint(path)?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &params {
                query.append_pair(name, value);
            }
        }

        tracing::debug!(path, params = params.len(), "POST remote attribute");
        let response = self
            .client
            .post(url)
            .send()
            .map_err(|error| map_reqwest_error(path, &error))?;
        ensure_success(path, response).map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    message: String,
}

fn ensure_success(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(map_http_error(path, status, &body))
}

fn map_http_error(path: &str, status: StatusCode, body: &str) -> ErrorEnvelope {
    let detail = serde_json::from_str::<ApiErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
        .filter(|message| !message.trim().is_empty());
    let message = detail.map_or_else(
        || format!("remote API returned {status} for {path}"),
        |detail| format!("remote API returned {status} for {path}: {detail}"),
    );

    ErrorEnvelope::transport(message, status_class(status))
        .with_metadata("path", path)
        .with_metadata("status", status.as_u16().to_string())
}

fn status_class(status: StatusCode) -> ErrorClass {
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        ErrorClass::Retriable
    } else {
        ErrorClass::NonRetriable
    }
}

fn map_reqwest_error(path: &str, error: &reqwest::Error) -> ErrorEnvelope {
    let class = if error.is_timeout() || error.is_connect() {
        ErrorClass::Retriable
    } else {
        ErrorClass::NonRetriable
    };
    let reason = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else {
        "request"
    };

    ErrorEnvelope::transport(
        format!(
            "remote API request for {path} failed: {}",
            redact_url_credentials(&error.to_string())
        ),
        class,
    )
    .with_metadata("path", path)
    .with_metadata("reason", reason)
}
