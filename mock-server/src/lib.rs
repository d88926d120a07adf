//! In-process stand-in for Traefik's admin API.
//!
//! Serves `GET /api/version` with a configurable payload, content type,
//! basic-auth requirement and artificial delay, and counts the requests it
//! answers. `tls` serves the same router behind a self-signed certificate.

pub mod tls;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Version {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Codename")]
    pub codename: String,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// What the mock answers with.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub version: Version,
    pub content_type: String,
    /// When set, requests without matching basic auth get a 401.
    pub credentials: Option<(String, String)>,
    pub delay: Option<Duration>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            version: Version {
                version: "2.9.6".to_string(),
                codename: "banon".to_string(),
                start_date: None,
            },
            content_type: JSON_CONTENT_TYPE.to_string(),
            credentials: None,
            delay: None,
        }
    }
}

impl MockConfig {
    #[must_use]
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_start_date(mut self, start_date: &str) -> Self {
        self.version.start_date = Some(start_date.to_string());
        self
    }
}

/// Shared router state: the configuration plus what the mock has observed.
#[derive(Clone, Debug)]
pub struct MockState {
    config: Arc<MockConfig>,
    hits: Arc<AtomicUsize>,
    last_authorization: Arc<Mutex<Option<String>>>,
}

impl MockState {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            hits: Arc::new(AtomicUsize::new(0)),
            last_authorization: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of `/api/version` requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request, if it had one.
    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Ok(mut last) = self.last_authorization.lock() {
            *last = auth;
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some((username, password)) = &self.config.credentials else {
            return true;
        };
        let expected = format!("Basic {}", STANDARD.encode(format!("{username}:{password}")));
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

pub fn app(config: MockConfig) -> Router {
    router(MockState::new(config))
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/version", get(version))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

/// A mock listening on a random local port.
#[derive(Clone, Debug)]
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: MockState,
}

impl MockServer {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn hits(&self) -> usize {
        self.state.hits()
    }
}

/// Binds `127.0.0.1:0` and serves plain HTTP on a background task.
pub async fn spawn(config: MockConfig) -> Result<MockServer, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::new(config);
    let app = router(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            debug!(error = %e, "mock server stopped");
        }
    });
    Ok(MockServer { addr, state })
}

async fn version(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.record(&headers);
    if let Some(delay) = state.config.delay {
        tokio::time::sleep(delay).await;
    }
    if !state.authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::WWW_AUTHENTICATE, "Basic realm=\"traefik\""),
            ],
            "401 Unauthorized\n",
        )
            .into_response();
    }
    match serde_json::to_string(&state.config.version) {
        Ok(body) => ([(header::CONTENT_TYPE, state.config.content_type.clone())], body).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
