use bytes::Bytes;
use rpcgate_core::ErrorBody;
use thiserror::Error;

/// Failure while serializing an error body
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised by marshalers that are not JSON based
    #[error("{0}")]
    Custom(String),
}

/// Serializes error bodies for the wire
pub trait Marshaler: Send + Sync {
    /// Value sent in the `Content-Type` header
    fn content_type(&self) -> &str;

    /// Encode the error body
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded
    fn marshal(&self, body: &ErrorBody) -> Result<Bytes, MarshalError>;
}

/// JSON marshaler
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaler {
    pretty: bool,
}

impl JsonMarshaler {
    /// Compact output
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Marshaler for JsonMarshaler {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn marshal(&self, body: &ErrorBody) -> Result<Bytes, MarshalError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(body)?
        } else {
            serde_json::to_vec(body)?
        };

        Ok(Bytes::from(encoded))
    }
}
