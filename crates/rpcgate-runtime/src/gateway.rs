use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::response::Response;
use http::StatusCode;
use http::request::Parts;
use rpcgate_core::AsStatus;

use crate::{
    BufferedResponse, ErrorHandlers, ErrorRenderer, HeaderMatcher, JsonMarshaler, Marshaler, OtherErrorHandler,
    ResponseWriter, default_header_matcher,
};

/// Error rendering front of the RPC-to-HTTP gateway
///
/// Owns the error strategies, the body marshaler and the outgoing header
/// matcher. Everything is fixed at build time, so a gateway can be shared
/// across request tasks without synchronization.
pub struct Gateway {
    handlers: ErrorHandlers,
    marshaler: Arc<dyn Marshaler>,
    header_matcher: HeaderMatcher,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    pub const fn handlers(&self) -> &ErrorHandlers {
        &self.handlers
    }

    pub fn marshaler(&self) -> &dyn Marshaler {
        self.marshaler.as_ref()
    }

    pub const fn header_matcher(&self) -> &HeaderMatcher {
        &self.header_matcher
    }

    /// Render a failed RPC call through the configured error renderer
    pub fn render_error(&self, parts: &Parts, w: &mut dyn ResponseWriter, err: &dyn AsStatus) {
        (self.handlers.error_renderer)(self, parts, self.marshaler.as_ref(), w, err);
    }

    /// Render a transport failure through the configured other-error handler
    pub fn render_other_error(&self, parts: &Parts, w: &mut dyn ResponseWriter, message: &str, status: StatusCode) {
        (self.handlers.other_error_handler)(w, parts, message, status);
    }

    /// Build the HTTP response for a failed RPC call
    ///
    /// Metadata for the call is read from `parts.extensions`.
    pub fn error_response(&self, parts: &Parts, err: &dyn AsStatus) -> Response {
        let mut w = BufferedResponse::new();
        self.render_error(parts, &mut w, err);
        w.into_response()
    }

    /// Build the HTTP response for a transport failure
    pub fn other_error_response(&self, parts: &Parts, message: &str, status: StatusCode) -> Response {
        let mut w = BufferedResponse::new();
        self.render_other_error(parts, &mut w, message, status);
        w.into_response()
    }

    /// Install gateway fallbacks on a router
    ///
    /// Unknown paths reply 404 and known paths with the wrong method reply
    /// 405, both through the other-error handler. Call once every route is
    /// registered; the 405 fallback only covers routes already present.
    pub fn route<S>(self: &Arc<Self>, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let not_found = Arc::clone(self);
        let not_allowed = Arc::clone(self);

        router
            .fallback(move |request: Request| {
                let gateway = Arc::clone(&not_found);
                async move { gateway.reply_status(request, StatusCode::NOT_FOUND) }
            })
            .method_not_allowed_fallback(move |request: Request| {
                let gateway = Arc::clone(&not_allowed);
                async move { gateway.reply_status(request, StatusCode::METHOD_NOT_ALLOWED) }
            })
    }

    fn reply_status(&self, request: Request, status: StatusCode) -> Response {
        let (parts, _) = request.into_parts();
        tracing::debug!(method = %parts.method, uri = %parts.uri, %status, "request not routed");

        let message = status.canonical_reason().unwrap_or("Unknown Status");
        self.other_error_response(&parts, message, status)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        GatewayBuilder::default().build()
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("handlers", &self.handlers)
            .field("content_type", &self.marshaler.content_type())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Gateway`]
///
/// Anything left unset uses the default renderer, the default other-error
/// handler, compact JSON and the `Grpc-Metadata-` header prefix.
#[derive(Default)]
pub struct GatewayBuilder {
    handlers: ErrorHandlers,
    marshaler: Option<Arc<dyn Marshaler>>,
    header_matcher: Option<HeaderMatcher>,
}

impl GatewayBuilder {
    /// Replace the error renderer
    #[must_use]
    pub fn error_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Gateway, &Parts, &dyn Marshaler, &mut dyn ResponseWriter, &dyn AsStatus) + Send + Sync + 'static,
    {
        self.handlers.error_renderer = Arc::new(renderer) as ErrorRenderer;
        self
    }

    /// Replace the other-error handler
    #[must_use]
    pub fn other_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn ResponseWriter, &Parts, &str, StatusCode) + Send + Sync + 'static,
    {
        self.handlers.other_error_handler = Arc::new(handler) as OtherErrorHandler;
        self
    }

    /// Replace both strategies at once
    #[must_use]
    pub fn handlers(mut self, handlers: ErrorHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    #[must_use]
    pub fn marshaler(mut self, marshaler: impl Marshaler + 'static) -> Self {
        self.marshaler = Some(Arc::new(marshaler));
        self
    }

    /// Control how metadata keys map to response header names
    #[must_use]
    pub fn header_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.with_header_matcher(Arc::new(matcher))
    }

    /// Install a prepared matcher such as [`prefix_header_matcher`]
    ///
    /// [`prefix_header_matcher`]: crate::prefix_header_matcher
    #[must_use]
    pub fn with_header_matcher(mut self, matcher: HeaderMatcher) -> Self {
        self.header_matcher = Some(matcher);
        self
    }

    pub fn build(self) -> Gateway {
        Gateway {
            handlers: self.handlers,
            marshaler: self.marshaler.unwrap_or_else(|| Arc::new(JsonMarshaler::new())),
            header_matcher: self.header_matcher.unwrap_or_else(default_header_matcher),
        }
    }
}
