use serde::{Deserialize, Serialize};

use crate::{Detail, Status, status_token};

/// Error body written to HTTP clients when an RPC fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

/// Contents of the `error` member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric RPC code
    pub code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Canonical status token, e.g. `NOT_FOUND`
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Detail>,
}

impl ErrorBody {
    /// Build the envelope for a failed call
    pub fn from_status(status: &Status) -> Self {
        Self {
            error: ErrorInfo {
                code: status.raw_code(),
                message: status.message().to_owned(),
                status: status_token(status.raw_code()).to_owned(),
                details: status.details().to_vec(),
            },
        }
    }
}

impl From<&Status> for ErrorBody {
    fn from(status: &Status) -> Self {
        Self::from_status(status)
    }
}
