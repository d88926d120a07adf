//! Basic authentication for the admin API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// A username/password pair sent as an `Authorization: Basic` header.
///
/// The password is kept in a `SecretString` and redacted from `Debug`.
#[derive(Debug)]
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Credentials exist only when both halves are set and non-empty.
    ///
    /// A lone username or a lone password yields `None`, so the request goes
    /// out unauthenticated.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(Self::new(user, pass))
            }
            _ => None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic <base64(username:password)>`.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl Clone for BasicAuth {
    fn clone(&self) -> Self {
        Self::new(self.username.clone(), self.password.expose_secret())
    }
}

impl PartialEq for BasicAuth {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

impl Eq for BasicAuth {}
