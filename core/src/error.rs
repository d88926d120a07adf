//! Error types for the Traefik admin API client.
//!
//! # Design
//! `NotJson` is the protocol-mismatch error: the server answered, but not
//! with the JSON content type the endpoint promises. Transport failures are
//! carried as the underlying `reqwest::Error` without reinterpretation so the
//! caller sees exactly what the transport saw.

use thiserror::Error;

/// Errors returned by `TraefikApi` parse methods and `ApiClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The response did not declare the expected JSON content type.
    #[error("Response is not in JSON format (content type: {})", .content_type.as_deref().unwrap_or("<missing>"))]
    NotJson { content_type: Option<String> },

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not a JSON object of the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// DNS, connect, TLS or timeout failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The client was closed before the call was issued.
    #[error("client closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_json_message_names_the_content_type() {
        let err = ApiError::NotJson {
            content_type: Some("text/html".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Response is not in JSON format (content type: text/html)"
        );
    }

    #[test]
    fn not_json_message_without_header() {
        let err = ApiError::NotJson { content_type: None };
        assert!(err.to_string().starts_with("Response is not in JSON format"));
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn http_error_message() {
        let err = ApiError::HttpError {
            status: 401,
            body: "401 Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 401: 401 Unauthorized");
    }
}
