//! Core types for translating RPC failures into HTTP error responses
//!
//! Holds the closed RPC status code set and its HTTP translation, the
//! status value carried by failed calls, the wire-level error envelope,
//! and the per-request metadata carrier.

#![allow(clippy::must_use_candidate)]

mod code;
pub mod details;
mod envelope;
mod metadata;
mod status;

pub use code::{Code, http_status, status_token};
pub use details::{Detail, DetailError, DetailMessage};
pub use envelope::{ErrorBody, ErrorInfo};
pub use metadata::ServerMetadata;
pub use status::{AsStatus, Status};
