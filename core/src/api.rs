//! Stateless HTTP request builder and response parser for the admin API.
//!
//! # Design
//! `TraefikApi` holds only the base URL, the optional credentials and the
//! content-type policy. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `ApiClient` runs the round-trip in between; tests and
//! other hosts can drive the same pair with any transport.

use serde_json::Value;

use crate::auth::BasicAuth;
use crate::config::ContentTypeCheck;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ResponseObject;

/// The only content type the admin API's JSON endpoints are accepted with
/// under `ContentTypeCheck::Exact`.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

pub const VERSION_PATH: &str = "/api/version";

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct TraefikApi {
    base_url: String,
    auth: Option<BasicAuth>,
    content_type_check: ContentTypeCheck,
}

impl TraefikApi {
    pub fn new(base_url: &str, auth: Option<BasicAuth>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            content_type_check: ContentTypeCheck::default(),
        }
    }

    #[must_use]
    pub fn with_content_type_check(mut self, check: ContentTypeCheck) -> Self {
        self.content_type_check = check;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> Option<&BasicAuth> {
        self.auth.as_ref()
    }

    pub fn build_version(&self) -> HttpRequest {
        self.build_get(VERSION_PATH)
    }

    pub fn parse_version(&self, response: HttpResponse) -> Result<ResponseObject, ApiError> {
        check_status(&response)?;
        check_content_type(&response, self.content_type_check)?;
        parse_object(&response.body)
    }

    fn build_get(&self, path: &str) -> HttpRequest {
        let headers = match &self.auth {
            Some(auth) => vec![("authorization".to_string(), auth.header_value())],
            None => Vec::new(),
        };
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers,
            body: None,
        }
    }
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn check_content_type(response: &HttpResponse, check: ContentTypeCheck) -> Result<(), ApiError> {
    let content_type = response.header("content-type");
    let accepted = match (check, content_type) {
        (_, None) => false,
        (ContentTypeCheck::Exact, Some(value)) => value == JSON_CONTENT_TYPE,
        (ContentTypeCheck::MediaType, Some(value)) => value
            .split(';')
            .next()
            .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json")),
    };
    if accepted {
        Ok(())
    } else {
        Err(ApiError::NotJson {
            content_type: content_type.map(str::to_string),
        })
    }
}

fn parse_object(body: &str) -> Result<ResponseObject, ApiError> {
    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => Ok(ResponseObject::new(map)),
        Ok(other) => Err(ApiError::DeserializationError(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ApiError::DeserializationError(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
