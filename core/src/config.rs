//! Connection settings for an `ApiClient`.
//!
//! Nothing here is validated: a bad port or an unknown scheme only surfaces
//! when a request is attempted and the transport rejects it.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::BasicAuth;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// How strictly the response `Content-Type` is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTypeCheck {
    /// Header must equal `application/json; charset=UTF-8` byte for byte.
    #[default]
    Exact,
    /// Media type must be `application/json`; case and parameters are ignored.
    MediaType,
}

/// Settings for one admin API instance.
///
/// Deserializable so a host application can embed it in its own config file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// When false, certificate-chain and hostname checks are both skipped.
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub content_type_check: ContentTypeCheck,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: default_scheme(),
            verify_tls: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            username: None,
            password: None,
            content_type_check: ContentTypeCheck::default(),
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_username(username).with_password(password)
    }

    #[must_use]
    pub fn with_content_type_check(mut self, check: ContentTypeCheck) -> Self {
        self.content_type_check = check;
        self
    }

    /// `{scheme}://{host}:{port}`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn basic_auth(&self) -> Option<BasicAuth> {
        BasicAuth::from_parts(self.username.as_deref(), self.password.as_deref())
    }

    /// Total request timeout; `0` disables it.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    /// A username containing `:` cannot be told apart from the password
    /// once encoded.
    pub(crate) fn has_ambiguous_username(&self) -> bool {
        self.basic_auth().is_some_and(|auth| auth.username().contains(':'))
    }

    /// Exactly one of username/password is set (or one of them is empty).
    pub(crate) fn has_partial_credentials(&self) -> bool {
        let user = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let pass = self.password.as_deref().is_some_and(|p| !p.is_empty());
        user != pass
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("content_type_check", &self.content_type_check)
            .finish()
    }
}
