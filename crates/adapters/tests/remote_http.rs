// Remote API client integration tests against a mock HTTP server.
#![allow(missing_docs)]

use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use storage_proxy_adapters::{HttpRemoteClient, HttpRemoteClientConfig};
use storage_proxy_ports::{RemoteClientPort, single_param};
use storage_proxy_shared::{ErrorClass, ErrorCode, Result};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The client is blocking, so it is built, used and dropped off the runtime.
async fn with_client<T, F>(base: String, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&HttpRemoteClient) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = HttpRemoteClient::new(HttpRemoteClientConfig {
            base_url: Url::parse(&base).unwrap(),
            timeout: Duration::from_secs(5),
        })?;
        call(&client)
    })
    .await
    .unwrap()
}

async fn serve_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scalar_reads_decode_by_type() -> Result<()> {
    let server = MockServer::start().await;
    serve_json(&server, "/storage_proxy/hinted_handoff_enabled", json!(true)).await;
    serve_json(&server, "/storage_proxy/max_hint_window_ms", json!(10_800_000)).await;
    serve_json(&server, "/storage_proxy/total_hints", json!(12_000_000_000_i64)).await;

    let (enabled, window, hints) = with_client(server.uri(), |client| {
        Ok((
            client.get_boolean("storage_proxy/hinted_handoff_enabled")?,
            client.get_int("storage_proxy/max_hint_window_ms")?,
            client.get_long("storage_proxy/total_hints")?,
        ))
    })
    .await?;

    assert!(enabled);
    assert_eq!(window, 10_800_000);
    assert_eq!(hints, 12_000_000_000);
    Ok(())
}

#[tokio::test]
async fn collection_reads_accept_both_map_encodings() -> Result<()> {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/storage_proxy/hinted_handoff_enabled_by_dc",
        json!(["dc2", "dc1"]),
    )
    .await;
    serve_json(
        &server,
        "/storage_proxy/schema_versions",
        json!({"59adb24e-f3cd-3e02-97f0-5b395827453f": ["127.0.0.1", "127.0.0.2"]}),
    )
    .await;
    serve_json(
        &server,
        "/storage_proxy/schema_versions_entries",
        json!([{
            "key": "59adb24e-f3cd-3e02-97f0-5b395827453f",
            "value": ["127.0.0.1", "127.0.0.2"],
        }]),
    )
    .await;

    let (dcs, object, entries) = with_client(server.uri(), |client| {
        Ok((
            client.get_string_set("storage_proxy/hinted_handoff_enabled_by_dc")?,
            client.get_string_list_map("storage_proxy/schema_versions")?,
            client.get_string_list_map("storage_proxy/schema_versions_entries")?,
        ))
    })
    .await?;

    assert_eq!(dcs.into_iter().collect::<Vec<_>>(), vec!["dc1", "dc2"]);
    let expected = BTreeMap::from([(
        "59adb24e-f3cd-3e02-97f0-5b395827453f".to_string(),
        vec!["127.0.0.1".to_string(), "127.0.0.2".to_string()],
    )]);
    assert_eq!(object, expected);
    assert_eq!(entries, expected);
    Ok(())
}

#[tokio::test]
async fn writes_send_query_parameters_with_an_empty_body() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage_proxy/hinted_handoff_enabled"))
        .and(query_param("enable", "false"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(server.uri(), |client| {
        client.post(
            "storage_proxy/hinted_handoff_enabled",
            single_param("enable", "false"),
        )
    })
    .await?;

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    Ok(())
}

#[tokio::test]
async fn base_url_path_prefix_is_preserved() -> Result<()> {
    let server = MockServer::start().await;
    serve_json(&server, "/api/storage_proxy/rpc_timeout", json!(10_000)).await;

    let timeout = with_client(format!("{}/api/", server.uri()), |client| {
        client.get_long("storage_proxy/rpc_timeout")
    })
    .await?;

    assert_eq!(timeout, 10_000);
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage_proxy/total_hints"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"message": "storage service not ready"})),
        )
        .mount(&server)
        .await;

    let error = with_client(server.uri(), |client| client.get_long("storage_proxy/total_hints"))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::transport());
    assert_eq!(error.class, ErrorClass::Retriable);
    assert!(error.message.contains("storage service not ready"));
    assert_eq!(error.metadata.get("status").map(String::as_str), Some("500"));
    assert_eq!(
        error.metadata.get("path").map(String::as_str),
        Some("storage_proxy/total_hints")
    );
}

#[tokio::test]
async fn rejected_writes_are_transport_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage_proxy/max_hint_window_ms"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let error = with_client(server.uri(), |client| {
        client.post("storage_proxy/max_hint_window_ms", single_param("ms", "-1"))
    })
    .await
    .unwrap_err();

    assert_eq!(error.code, ErrorCode::transport());
    assert_eq!(error.class, ErrorClass::NonRetriable);
}

#[tokio::test]
async fn mistyped_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    serve_json(&server, "/storage_proxy/hinted_handoff_enabled", json!("yes")).await;

    let error = with_client(server.uri(), |client| {
        client.get_boolean("storage_proxy/hinted_handoff_enabled")
    })
    .await
    .unwrap_err();

    assert_eq!(error.code, ErrorCode::decode());
}

#[tokio::test]
async fn unreachable_server_is_a_retriable_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let error = with_client(uri, |client| {
        client.get_boolean("storage_proxy/hinted_handoff_enabled")
    })
    .await
    .unwrap_err();

    assert_eq!(error.code, ErrorCode::transport());
    assert_eq!(error.class, ErrorClass::Retriable);
}
