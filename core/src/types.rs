//! Response DTOs for the admin API.
//!
//! # Design
//! Traefik's payloads are loosely specified and change between releases, so
//! `ResponseObject` keeps the decoded JSON object as-is and offers lookups
//! by field name. Known fields get typed convenience accessors; anything
//! else stays reachable through `get`.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A JSON object returned by an endpoint, readable field by field.
///
/// Values are kept exactly as decoded: nested objects and arrays stay nested,
/// numbers stay numbers. The object is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseObject {
    fields: Map<String, Value>,
}

impl ResponseObject {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The field as a string slice, if present and a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in the order the server sent them.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }

    /// Reads the whole object as a typed value.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&Value::Object(self.fields.clone()))
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// `Version` field of a version response.
    pub fn version(&self) -> Option<&str> {
        self.get_str("Version")
    }

    /// `Codename` field of a version response.
    pub fn codename(&self) -> Option<&str> {
        self.get_str("Codename")
    }

    /// `startDate` field of a version response.
    pub fn start_date(&self) -> Option<&str> {
        self.get_str("startDate")
    }
}

impl From<Map<String, Value>> for ResponseObject {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Renders the full field mapping as compact JSON, in insertion order.
impl fmt::Display for ResponseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Typed view of `GET /api/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Codename")]
    pub codename: String,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}
