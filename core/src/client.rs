//! Async session against one admin API instance.
//!
//! # Design
//! `ApiClient` pairs a `TraefikApi` (request building, response parsing)
//! with a reqwest session that does the I/O. The session is built once with
//! the configured timeout and TLS policy and is shared by every call; closing
//! the client drops it, after which calls fail with `ApiError::Closed`.
//!
//! No retries: every failure goes straight back to the caller.

use reqwest::header::{HeaderName, HeaderValue};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::TraefikApi;
use crate::auth::BasicAuth;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ResponseObject, VersionInfo};

/// Client for the Traefik admin API.
///
/// Construction performs no network I/O. All methods take `&self`, so a
/// client can be shared between tasks behind an `Arc`; concurrent calls go
/// through reqwest's connection pool. Dropping the client releases the
/// session just like `close`.
#[derive(Debug)]
pub struct ApiClient {
    config: ClientConfig,
    api: TraefikApi,
    session: RwLock<Option<reqwest::Client>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        if !config.verify_tls {
            warn!(host = %config.host, "TLS certificate and hostname verification disabled");
        }
        if config.has_partial_credentials() {
            warn!(
                host = %config.host,
                "only one of username/password is set; requests will be sent without authentication"
            );
        }

        if config.has_ambiguous_username() {
            warn!(
                host = %config.host,
                "username contains ':'; the server may split the credentials differently"
            );
        }

        // With rustls, accepting invalid certs also skips the hostname check.
        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(!config.verify_tls);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let session = builder.build()?;

        let api = TraefikApi::new(&config.base_url(), config.basic_auth())
            .with_content_type_check(config.content_type_check);

        debug!(base_url = api.base_url(), "admin API client created");
        Ok(Self {
            config,
            api,
            session: RwLock::new(Some(session)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{scheme}://{host}:{port}`.
    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Credentials attached to each request, if both username and password are set.
    pub fn auth_header(&self) -> Option<&BasicAuth> {
        self.api.auth()
    }

    /// `GET /api/version`, returned as a generic object.
    pub async fn version(&self) -> Result<ResponseObject, ApiError> {
        let response = self.execute(self.api.build_version()).await?;
        self.api.parse_version(response)
    }

    /// `GET /api/version`, read into `VersionInfo`.
    pub async fn version_info(&self) -> Result<VersionInfo, ApiError> {
        self.version().await?.deserialize_into()
    }

    /// Releases the session and its connection pool. Further calls fail
    /// with `ApiError::Closed`; closing twice is a no-op.
    pub async fn close(&self) {
        if self.session.write().await.take().is_some() {
            info!(base_url = self.base_url(), "admin API client closed");
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.session.read().await.is_none()
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        // The guard is dropped before the request is awaited so `close` never
        // waits on in-flight calls.
        let session = self.session.read().await.clone().ok_or(ApiError::Closed)?;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
        };
        debug!(method = request.method.as_str(), url = %request.path, "sending request");

        let mut builder = session.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect();
        let body = response.text().await?;

        debug!(status, url = %request.path, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Non-ASCII bytes in a value are decoded lossily rather than dropped.
fn header_pair(name: &HeaderName, value: &HeaderValue) -> (String, String) {
    let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
    (name.as_str().to_string(), value)
}
