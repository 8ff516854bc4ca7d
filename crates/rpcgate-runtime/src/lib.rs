//! Error rendering for the RPC-to-HTTP gateway
//!
//! Turns failed RPC calls into HTTP responses: the structured JSON error
//! envelope for calls that produced a status, and a plain-text reply for
//! transport failures that never reached a handler.

#![allow(clippy::must_use_candidate)]

mod forward;
mod gateway;
mod handlers;
mod marshal;
mod render;
mod writer;

pub use forward::{
    HeaderMatcher, METADATA_HEADER_PREFIX, METADATA_TRAILER_PREFIX, default_header_matcher, prefix_header_matcher,
};
pub use gateway::{Gateway, GatewayBuilder};
pub use handlers::{ErrorHandlers, ErrorRenderer, OtherErrorHandler};
pub use marshal::{JsonMarshaler, MarshalError, Marshaler};
pub use render::{MARSHAL_FALLBACK_BODY, default_error_renderer, default_other_error_handler};
pub use writer::{BufferedResponse, ResponseWriter};
