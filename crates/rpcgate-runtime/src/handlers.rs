use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use http::request::Parts;
use rpcgate_core::AsStatus;

use crate::{Gateway, Marshaler, ResponseWriter, default_error_renderer, default_other_error_handler};

/// Renders a failed RPC call into a response
pub type ErrorRenderer =
    Arc<dyn Fn(&Gateway, &Parts, &dyn Marshaler, &mut dyn ResponseWriter, &dyn AsStatus) + Send + Sync>;

/// Renders a transport failure that happened before any RPC status existed
///
/// Receives the message and the HTTP status to reply with.
pub type OtherErrorHandler = Arc<dyn Fn(&mut dyn ResponseWriter, &Parts, &str, StatusCode) + Send + Sync>;

/// Replaceable error rendering strategies used by a [`Gateway`]
///
/// Fixed once the gateway is built.
#[derive(Clone)]
pub struct ErrorHandlers {
    pub error_renderer: ErrorRenderer,
    pub other_error_handler: OtherErrorHandler,
}

impl Default for ErrorHandlers {
    fn default() -> Self {
        Self {
            error_renderer: Arc::new(default_error_renderer),
            other_error_handler: Arc::new(default_other_error_handler),
        }
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlers").finish_non_exhaustive()
    }
}
