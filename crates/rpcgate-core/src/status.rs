use std::fmt;

use crate::{Code, Detail};

/// Structured failure reported by an RPC handler
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    code: i32,
    message: String,
    details: Vec<Detail>,
}

impl Status {
    /// Create a status with a known code
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self::from_raw(code.as_i32(), message)
    }

    /// Create a status from a raw numeric code
    ///
    /// The value is kept as-is even when it falls outside the known set, so
    /// newer backends can still be passed through.
    pub fn from_raw(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach detail records, replacing any existing ones
    #[must_use]
    pub fn with_details(mut self, details: Vec<Detail>) -> Self {
        self.details = details;
        self
    }

    /// Append a single detail record
    #[must_use]
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.details.push(detail);
        self
    }

    /// Raw numeric code
    pub const fn raw_code(&self) -> i32 {
        self.code
    }

    /// Known code, if the numeric value is in the defined set
    pub const fn code(&self) -> Option<Code> {
        Code::from_i32(self.code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[Detail] {
        &self.details
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "rpc error: code = {code} desc = {}", self.message),
            None => write!(f, "rpc error: code = {} desc = {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Status {}

impl From<&tonic::Status> for Status {
    fn from(status: &tonic::Status) -> Self {
        Self::from_raw(i32::from(status.code()), status.message())
    }
}

impl From<tonic::Status> for Status {
    fn from(status: tonic::Status) -> Self {
        Self::from(&status)
    }
}

/// Capability of an error value to expose an RPC status
///
/// Errors that do not carry a status return `None`; the renderer then
/// reports them as `UNKNOWN` using their display text as the message.
pub trait AsStatus: fmt::Display {
    fn as_status(&self) -> Option<Status>;
}

impl AsStatus for Status {
    fn as_status(&self) -> Option<Status> {
        Some(self.clone())
    }
}

impl AsStatus for tonic::Status {
    fn as_status(&self) -> Option<Status> {
        Some(Status::from(self))
    }
}

impl AsStatus for anyhow::Error {
    fn as_status(&self) -> Option<Status> {
        self.downcast_ref::<Status>()
            .cloned()
            .or_else(|| self.downcast_ref::<tonic::Status>().map(Status::from))
    }
}
