use std::fmt;

use http::StatusCode;

/// RPC status codes
///
/// The set is fixed by the RPC protocol and never extended here. Numeric
/// values match the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Code {
    /// Not an error
    Ok = 0,
    /// The operation was cancelled, typically by the caller
    Cancelled = 1,
    /// Unknown error, typically a server bug
    Unknown = 2,
    /// The client specified an invalid argument
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete
    DeadlineExceeded = 4,
    /// A requested entity was not found
    NotFound = 5,
    /// The entity the client tried to create already exists
    AlreadyExists = 6,
    /// The caller lacks permission for the operation
    PermissionDenied = 7,
    /// A quota or rate limit was exhausted
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation
    FailedPrecondition = 9,
    /// The operation was aborted, typically by a concurrency conflict
    Aborted = 10,
    /// The operation was attempted past the valid range
    OutOfRange = 11,
    /// The operation is not implemented or supported
    Unimplemented = 12,
    /// Internal error
    Internal = 13,
    /// The service is currently unavailable
    Unavailable = 14,
    /// Unrecoverable data loss or corruption
    DataLoss = 15,
    /// The request lacks valid authentication credentials
    Unauthenticated = 16,
}

impl Code {
    /// All codes in numeric order
    pub const ALL: [Self; 17] = [
        Self::Ok,
        Self::Cancelled,
        Self::Unknown,
        Self::InvalidArgument,
        Self::DeadlineExceeded,
        Self::NotFound,
        Self::AlreadyExists,
        Self::PermissionDenied,
        Self::ResourceExhausted,
        Self::FailedPrecondition,
        Self::Aborted,
        Self::OutOfRange,
        Self::Unimplemented,
        Self::Internal,
        Self::Unavailable,
        Self::DataLoss,
        Self::Unauthenticated,
    ];

    /// Look up a code by its numeric value
    pub const fn from_i32(value: i32) -> Option<Self> {
        let code = match value {
            0 => Self::Ok,
            1 => Self::Cancelled,
            2 => Self::Unknown,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => return None,
        };

        Some(code)
    }

    /// Numeric wire value
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Canonical status token sent in the `status` field of error bodies
    ///
    /// `Unimplemented` is reported as `NOT_IMPLEMENTED`, and `Cancelled`
    /// keeps the double-L spelling clients already match on.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "NOT_IMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// HTTP status conventionally associated with this code
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::Cancelled | Self::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
            Self::Unknown | Self::Internal | Self::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidArgument | Self::OutOfRange => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::Aborted => StatusCode::CONFLICT,
            Self::PermissionDenied | Self::ResourceExhausted => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            Self::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.as_i32()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Status token for a raw numeric code
///
/// Values outside the known set map to `INTERNAL`.
pub fn status_token(code: i32) -> &'static str {
    Code::from_i32(code).map_or_else(
        || {
            tracing::warn!(code, "unknown rpc status code");
            Code::Internal.token()
        },
        Code::token,
    )
}

/// HTTP status for a raw numeric code
///
/// Values outside the known set map to 500.
pub fn http_status(code: i32) -> StatusCode {
    Code::from_i32(code).map_or_else(
        || {
            tracing::warn!(code, "unknown rpc status code");
            StatusCode::INTERNAL_SERVER_ERROR
        },
        Code::http_status,
    )
}
