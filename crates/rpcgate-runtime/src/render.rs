use http::StatusCode;
use http::header::{self, HeaderValue};
use http::request::Parts;
use rpcgate_core::{AsStatus, Code, ErrorBody, ServerMetadata, Status};

use crate::forward::{declare_trailers, forward_header_metadata, forward_trailer_metadata};
use crate::{Gateway, Marshaler, ResponseWriter};

/// Body sent when the error envelope itself cannot be encoded
pub const MARSHAL_FALLBACK_BODY: &str = r#"{"error": "failed to marshal error message"}"#;

/// Default [`ErrorRenderer`](crate::ErrorRenderer)
///
/// Writes the error envelope with status 200: the HTTP exchange succeeded
/// and clients read the RPC outcome from the body's `code` and `status`
/// members. Errors without an RPC status are reported as `UNKNOWN` with
/// their alternate display text (the full cause chain for `anyhow`) as the
/// message. Header and trailer metadata stored
/// in the request extensions are forwarded around the body.
pub fn default_error_renderer(
    gateway: &Gateway,
    parts: &Parts,
    marshaler: &dyn Marshaler,
    w: &mut dyn ResponseWriter,
    err: &dyn AsStatus,
) {
    w.headers_mut().remove(header::TRAILER);
    match HeaderValue::try_from(marshaler.content_type()) {
        Ok(content_type) => {
            w.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        Err(e) => tracing::warn!(content_type = marshaler.content_type(), error = %e, "invalid marshaler content type"),
    }

    let status = err.as_status().unwrap_or_else(|| Status::new(Code::Unknown, format!("{err:#}")));
    let body = ErrorBody::from_status(&status);

    let buf = match marshaler.marshal(&body) {
        Ok(buf) => buf,
        Err(e) => {
            tracing::error!(?body, error = %e, "failed to marshal error message");
            w.write_head(StatusCode::INTERNAL_SERVER_ERROR);
            if let Err(e) = w.write_body(MARSHAL_FALLBACK_BODY.as_bytes()) {
                tracing::error!(error = %e, "failed to write response");
            }
            return;
        }
    };

    let metadata = ServerMetadata::from_extensions(&parts.extensions);
    if metadata.is_none() {
        tracing::warn!(uri = %parts.uri, "no server metadata attached to request");
    }

    forward_header_metadata(w, gateway.header_matcher(), metadata);
    declare_trailers(w, metadata);

    w.write_head(StatusCode::OK);
    if let Err(e) = w.write_body(&buf) {
        tracing::error!(error = %e, "failed to write response");
    }

    forward_trailer_metadata(w, metadata);
}

/// Default [`OtherErrorHandler`](crate::OtherErrorHandler)
///
/// Replies with the message as plain text and the given status.
pub fn default_other_error_handler(w: &mut dyn ResponseWriter, _parts: &Parts, message: &str, status: StatusCode) {
    let headers = w.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    w.write_head(status);
    if let Err(e) = w.write_body(format!("{message}\n").as_bytes()) {
        tracing::error!(error = %e, "failed to write response");
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use bytes::Bytes;
    use http::HeaderMap;
    use rpcgate_core::details::{BadRequest, FieldViolation};
    use rpcgate_core::{Detail, DetailMessage};
    use serde_json::{Value, json};

    use super::*;
    use crate::{BufferedResponse, JsonMarshaler, MarshalError};

    struct FailingMarshaler;

    impl Marshaler for FailingMarshaler {
        fn content_type(&self) -> &str {
            "application/json"
        }

        fn marshal(&self, _body: &ErrorBody) -> Result<Bytes, MarshalError> {
            Err(MarshalError::Custom("forced failure".to_owned()))
        }
    }

    /// Sink whose body writes always fail
    #[derive(Default)]
    struct BrokenPipe {
        status: Option<StatusCode>,
        headers: HeaderMap,
        trailers: HeaderMap,
        writes: usize,
    }

    impl ResponseWriter for BrokenPipe {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }

        fn trailers_mut(&mut self) -> &mut HeaderMap {
            &mut self.trailers
        }

        fn write_head(&mut self, status: StatusCode) {
            self.status.get_or_insert(status);
        }

        fn write_body(&mut self, _data: &[u8]) -> io::Result<()> {
            self.writes += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }
    }

    fn request() -> Parts {
        http::Request::builder().uri("/v1/books/1").body(()).unwrap().into_parts().0
    }

    fn render(parts: &Parts, err: &dyn AsStatus) -> BufferedResponse {
        let gateway = Gateway::default();
        let mut w = BufferedResponse::new();
        default_error_renderer(&gateway, parts, &JsonMarshaler::new(), &mut w, err);
        w
    }

    fn body_json(w: &BufferedResponse) -> Value {
        serde_json::from_slice(w.body()).unwrap()
    }

    #[test]
    fn rpc_status_renders_envelope_with_ok_status_line() {
        let w = render(&request(), &Status::new(Code::NotFound, "missing"));

        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(w.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(&w),
            json!({"error": {"code": 5, "message": "missing", "status": "NOT_FOUND"}})
        );
    }

    #[test]
    fn plain_error_becomes_unknown() {
        let err = anyhow::anyhow!("boom");
        let w = render(&request(), &err);

        assert_eq!(
            body_json(&w),
            json!({"error": {"code": Code::Unknown.as_i32(), "message": "boom", "status": "UNKNOWN"}})
        );
    }

    #[test]
    fn plain_error_message_keeps_context_chain() {
        let err = anyhow::anyhow!("disk full").context("saving book");
        let w = render(&request(), &err);

        assert_eq!(body_json(&w)["error"]["message"], "saving book: disk full");
    }

    #[test]
    fn declared_trailers_match_sent_trailers() {
        let mut parts = request();
        parts
            .extensions
            .insert(ServerMetadata::new().with_trailer("a b", "v").with_trailer("checksum", "c"));

        let w = render(&parts, &Status::new(Code::Internal, "x"));

        let declared: Vec<_> = w.headers().get_all(header::TRAILER).iter().collect();
        assert_eq!(declared, vec!["Grpc-Trailer-checksum"]);
        assert_eq!(declared.len(), w.trailers().len());
    }

    #[test]
    fn details_are_rendered_with_type_tags() {
        let detail = Detail::pack(&BadRequest {
            field_violations: vec![FieldViolation {
                field: "title".to_owned(),
                description: "required".to_owned(),
            }],
        })
        .unwrap();
        let status = Status::new(Code::InvalidArgument, "bad book").with_detail(detail);

        let w = render(&request(), &status);
        let body = body_json(&w);

        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
        assert_eq!(body["error"]["details"][0]["@type"], BadRequest::TYPE_URL);
        assert_eq!(body["error"]["details"][0]["fieldViolations"][0]["field"], "title");
    }

    #[test]
    fn marshal_failure_writes_fixed_fallback() {
        let gateway = Gateway::default();
        let mut parts = request();
        parts.extensions.insert(ServerMetadata::new().with_header("k", "v").with_trailer("t", "x"));

        let mut w = BufferedResponse::new();
        w.headers_mut().insert(header::TRAILER, HeaderValue::from_static("Stale"));
        default_error_renderer(
            &gateway,
            &parts,
            &FailingMarshaler,
            &mut w,
            &Status::new(Code::Internal, "x"),
        );

        assert_eq!(w.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(w.body(), MARSHAL_FALLBACK_BODY.as_bytes());
        assert_eq!(w.headers().len(), 1);
        assert_eq!(w.headers()[header::CONTENT_TYPE], "application/json");
        assert!(w.trailers().is_empty());
    }

    #[test]
    fn missing_metadata_still_renders() {
        let w = render(&request(), &Status::new(Code::Aborted, "retry"));

        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(w.headers().len(), 1);
        assert!(w.headers().get(header::TRAILER).is_none());
        assert!(w.trailers().is_empty());
    }

    #[test]
    fn metadata_is_forwarded_as_headers_and_trailers() {
        let mut parts = request();
        parts.extensions.insert(
            ServerMetadata::new()
                .with_header("request-id", "r-1")
                .with_trailer("retry-after", "5"),
        );

        let w = render(&parts, &Status::new(Code::ResourceExhausted, "slow down"));

        assert_eq!(w.headers()["grpc-metadata-request-id"], "r-1");
        assert_eq!(w.headers()[header::TRAILER], "Grpc-Trailer-retry-after");
        assert_eq!(w.trailers()["grpc-trailer-retry-after"], "5");
    }

    #[test]
    fn stale_trailer_declaration_is_replaced() {
        let gateway = Gateway::default();
        let mut w = BufferedResponse::new();
        w.headers_mut().insert(header::TRAILER, HeaderValue::from_static("Old-Trailer"));

        default_error_renderer(
            &gateway,
            &request(),
            &JsonMarshaler::new(),
            &mut w,
            &Status::new(Code::Internal, "x"),
        );

        assert!(w.headers().get(header::TRAILER).is_none());
    }

    #[test]
    fn write_failure_is_logged_not_retried() {
        let gateway = Gateway::default();
        let mut w = BrokenPipe::default();

        default_error_renderer(
            &gateway,
            &request(),
            &JsonMarshaler::new(),
            &mut w,
            &Status::new(Code::DataLoss, "gone"),
        );

        assert_eq!(w.status, Some(StatusCode::OK));
        assert_eq!(w.writes, 1);
    }

    #[test]
    fn other_error_handler_writes_plain_text() {
        let mut w = BufferedResponse::new();
        default_other_error_handler(&mut w, &request(), "not allowed", StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(w.status(), Some(StatusCode::METHOD_NOT_ALLOWED));
        assert_eq!(w.body(), b"not allowed\n");
        assert_eq!(w.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(w.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
