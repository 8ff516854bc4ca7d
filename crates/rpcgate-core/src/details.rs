//! Typed detail records attached to a status
//!
//! Each record carries its own type URL so clients can decode it without
//! knowing the producer. On the wire a record is a JSON object whose `@type`
//! member names the type and whose other members are the payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while packing or unpacking detail records
#[derive(Debug, Error)]
pub enum DetailError {
    /// The payload did not serialize to a JSON object
    #[error("detail payload for '{0}' must serialize to a JSON object")]
    NotAnObject(&'static str),

    /// The payload could not be converted to or from JSON
    #[error("invalid detail payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// A message type that can be carried as a detail record
pub trait DetailMessage: Serialize + DeserializeOwned {
    /// Fully qualified type URL written to `@type`
    const TYPE_URL: &'static str;
}

/// Self-describing detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(rename = "@type")]
    type_url: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Detail {
    /// Build a record from a type URL and raw payload members
    pub fn new(type_url: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            type_url: type_url.into(),
            fields,
        }
    }

    /// Wrap a typed message
    ///
    /// # Errors
    ///
    /// Returns an error if the message does not serialize to a JSON object
    pub fn pack<T: DetailMessage>(message: &T) -> Result<Self, DetailError> {
        match serde_json::to_value(message)? {
            Value::Object(fields) => Ok(Self::new(T::TYPE_URL, fields)),
            _ => Err(DetailError::NotAnObject(T::TYPE_URL)),
        }
    }

    /// Decode the payload as `T`
    ///
    /// Returns `None` when the record holds a different type.
    pub fn unpack<T: DetailMessage>(&self) -> Option<Result<T, DetailError>> {
        if self.type_url != T::TYPE_URL {
            return None;
        }

        Some(serde_json::from_value(Value::Object(self.fields.clone())).map_err(DetailError::from))
    }

    /// Type URL of the payload
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// Raw payload members
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Machine-readable reason for a failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorReason {
    /// Short constant identifying the cause, e.g. `API_DISABLED`
    pub reason: String,
    /// Logical grouping the reason belongs to
    pub domain: String,
    /// Additional structured context
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DetailMessage for ErrorReason {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.ErrorInfo";
}

/// Field-level violations in a rejected request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BadRequest {
    pub field_violations: Vec<FieldViolation>,
}

/// A single invalid field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldViolation {
    /// Path to the offending field, e.g. `book.title`
    pub field: String,
    pub description: String,
}

impl DetailMessage for BadRequest {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.BadRequest";
}

/// How long a client should wait before retrying
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryInfo {
    /// Protobuf JSON duration, e.g. `1.5s`
    pub retry_delay: String,
}

impl DetailMessage for RetryInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.RetryInfo";
}

/// Error message localized for the end user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedMessage {
    /// BCP-47 locale tag, e.g. `en-US`
    pub locale: String,
    pub message: String,
}

impl DetailMessage for LocalizedMessage {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.LocalizedMessage";
}
