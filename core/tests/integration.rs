//! `ApiClient` against the live mock server over real HTTP.
//!
//! Each test spawns its own mock on a random port so tests stay independent.

use std::sync::Arc;
use std::time::Duration;

use mock_server::{MockConfig, MockServer};
use traefik_core::{ApiClient, ApiError, ClientConfig, ContentTypeCheck};

async fn spawn(config: MockConfig) -> MockServer {
    mock_server::spawn(config).await.unwrap()
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new("127.0.0.1", server.port())
}

#[tokio::test]
async fn version_returns_fields_by_name() {
    let server = spawn(MockConfig::default()).await;
    let client = ApiClient::new(config_for(&server)).unwrap();

    let version = client.version().await.unwrap();
    assert_eq!(version.get_str("Version"), Some("2.9.6"));
    assert_eq!(version.get_str("Codename"), Some("banon"));
    assert_eq!(version.to_string(), r#"{"Version":"2.9.6","Codename":"banon"}"#);
    assert_eq!(server.hits(), 1);

    client.close().await;
}

#[tokio::test]
async fn version_info_is_typed() {
    let config = MockConfig::default().with_start_date("2024-08-01T09:00:00Z");
    let server = spawn(config).await;
    let client = ApiClient::new(config_for(&server)).unwrap();

    let info = client.version_info().await.unwrap();
    assert_eq!(info.version, "2.9.6");
    assert_eq!(info.codename, "banon");
    assert_eq!(info.start_date.as_deref(), Some("2024-08-01T09:00:00Z"));
}

#[tokio::test]
async fn json_without_charset_is_rejected() {
    let server = spawn(MockConfig::default().with_content_type("application/json")).await;
    let client = ApiClient::new(config_for(&server)).unwrap();

    let err = client.version().await.unwrap_err();
    assert!(
        matches!(err, ApiError::NotJson { content_type: Some(ref ct) } if ct == "application/json"),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().starts_with("Response is not in JSON format"));
}

#[tokio::test]
async fn media_type_check_accepts_json_without_charset() {
    let server = spawn(MockConfig::default().with_content_type("application/json")).await;
    let config = config_for(&server).with_content_type_check(ContentTypeCheck::MediaType);
    let client = ApiClient::new(config).unwrap();

    let version = client.version().await.unwrap();
    assert_eq!(version.version(), Some("2.9.6"));
}

#[tokio::test]
async fn credentials_are_sent_as_basic_auth() {
    let server = spawn(MockConfig::default().with_credentials("admin", "secret")).await;
    let config = config_for(&server).with_credentials("admin", "secret");
    let client = ApiClient::new(config).unwrap();

    let version = client.version().await.unwrap();
    assert_eq!(version.version(), Some("2.9.6"));
    assert_eq!(
        server.state.last_authorization().as_deref(),
        Some("Basic YWRtaW46c2VjcmV0")
    );
}

#[tokio::test]
async fn wrong_credentials_surface_http_error() {
    let server = spawn(MockConfig::default().with_credentials("admin", "secret")).await;
    let config = config_for(&server).with_credentials("admin", "wrong");
    let client = ApiClient::new(config).unwrap();

    let err = client.version().await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn partial_credentials_send_no_auth_header() {
    let server = spawn(MockConfig::default()).await;
    let config = config_for(&server).with_username("admin").with_password("");
    let client = ApiClient::new(config).unwrap();
    assert!(client.auth_header().is_none());

    client.version().await.unwrap();
    assert_eq!(server.hits(), 1);
    assert!(server.state.last_authorization().is_none());
}

#[tokio::test]
async fn calls_after_close_fail_deterministically() {
    let server = spawn(MockConfig::default()).await;
    let client = ApiClient::new(config_for(&server)).unwrap();

    client.version().await.unwrap();
    client.close().await;

    for _ in 0..3 {
        let err = client.version().await.unwrap_err();
        assert!(matches!(err, ApiError::Closed));
    }
    assert!(matches!(client.version_info().await.unwrap_err(), ApiError::Closed));
    assert_eq!(server.hits(), 1, "no request may reach the server after close");
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = spawn(MockConfig::default().with_delay(Duration::from_millis(50))).await;
    let client = Arc::new(ApiClient::new(config_for(&server)).unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let client = Arc::clone(&client);
        tasks.spawn(async move { client.version().await });
    }

    let mut completed = 0;
    while let Some(result) = tasks.join_next().await {
        let version = result.unwrap().unwrap();
        assert_eq!(version.version(), Some("2.9.6"));
        completed += 1;
    }
    assert_eq!(completed, 16);
    assert_eq!(server.hits(), 16);
}

#[tokio::test]
async fn slow_server_hits_the_timeout() {
    let server = spawn(MockConfig::default().with_delay(Duration::from_secs(3))).await;
    let config = config_for(&server).with_timeout_seconds(1);
    let client = ApiClient::new(config).unwrap();

    let err = client.version().await.unwrap_err();
    match err {
        ApiError::Transport(e) => assert!(e.is_timeout(), "expected timeout, got {e:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn zero_timeout_disables_the_timeout() {
    let server = spawn(MockConfig::default().with_delay(Duration::from_millis(200))).await;
    let config = config_for(&server).with_timeout_seconds(0);
    let client = ApiClient::new(config).unwrap();

    let version = client.version().await.unwrap();
    assert_eq!(version.version(), Some("2.9.6"));
}

#[tokio::test]
async fn caller_cancellation_aborts_the_request() {
    let server = spawn(MockConfig::default().with_delay(Duration::from_secs(5))).await;
    let client = ApiClient::new(config_for(&server)).unwrap();

    let result = tokio::time::timeout(Duration::from_millis(200), client.version()).await;
    assert!(result.is_err(), "the call should still be pending when cancelled");

    // The client stays usable after a cancelled call.
    assert!(!client.is_closed().await);
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(ClientConfig::new("127.0.0.1", port)).unwrap();

    let err = client.version().await.unwrap_err();
    match err {
        ApiError::Transport(e) => assert!(e.is_connect(), "expected connect error, got {e:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn dropping_the_client_leaves_the_server_running() {
    let server = spawn(MockConfig::default()).await;
    {
        let client = ApiClient::new(config_for(&server)).unwrap();
        client.version().await.unwrap();
    }
    let client = ApiClient::new(config_for(&server)).unwrap();
    client.version().await.unwrap();
    assert_eq!(server.hits(), 2);
}
