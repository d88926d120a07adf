//! Async client for Traefik's administrative HTTP API.
//!
//! # Overview
//! `ApiClient` owns one HTTP session (timeout, TLS policy, optional basic
//! auth) against a single Traefik instance and exposes its read endpoints.
//! Responses come back as `ResponseObject`, a JSON object readable by field
//! name.
//!
//! # Design
//! - `TraefikApi` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO).
//! - `ApiClient` executes those requests with reqwest and tracks the
//!   open/closed state of the session.
//! - Types use owned `String` / `Vec` fields so they move freely across tasks.
//!
//! ```no_run
//! use traefik_core::{ApiClient, ClientConfig};
//!
//! # async fn run() -> Result<(), traefik_core::ApiError> {
//! let client = ApiClient::new(ClientConfig::new("localhost", 8080).with_credentials("admin", "secret"))?;
//! let version = client.version().await?;
//! println!("{version}");
//! client.close().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use api::{TraefikApi, JSON_CONTENT_TYPE};
pub use auth::BasicAuth;
pub use client::ApiClient;
pub use config::{ClientConfig, ContentTypeCheck};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ResponseObject, VersionInfo};
