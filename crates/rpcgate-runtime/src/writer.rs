use std::io;

use axum::body::Body;
use axum::response::Response;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};

/// Destination of a rendered error response
///
/// Mirrors the shape of an HTTP response being written: headers may be
/// changed until the status is written, the status is written once, and
/// trailers are sent after the body.
pub trait ResponseWriter {
    /// Response headers
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Response trailers
    fn trailers_mut(&mut self) -> &mut HeaderMap;

    /// Write the status line
    ///
    /// Only the first call takes effect.
    fn write_head(&mut self, status: StatusCode);

    /// Append body bytes, writing a 200 status first if none was written
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sink rejects the write
    fn write_body(&mut self, data: &[u8]) -> io::Result<()>;
}

/// In-memory response that converts into an axum [`Response`]
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    trailers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Written status, if any
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn trailers(&self) -> &HeaderMap {
        &self.trailers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Build the HTTP response
    ///
    /// Trailers, when present, are emitted as a trailers frame after the body.
    pub fn into_response(self) -> Response {
        let bytes: Bytes = self.body.freeze();

        let body = if self.trailers.is_empty() {
            Body::from(bytes)
        } else {
            let trailers = self.trailers;
            Body::new(Full::new(bytes).with_trailers(std::future::ready(Some(Ok(trailers)))))
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn trailers_mut(&mut self) -> &mut HeaderMap {
        &mut self.trailers
    }

    fn write_head(&mut self, status: StatusCode) {
        if let Some(written) = self.status {
            tracing::warn!(%written, ignored = %status, "response status already written");
            return;
        }

        self.status = Some(status);
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        if self.status.is_none() {
            self.write_head(StatusCode::OK);
        }

        self.body.extend_from_slice(data);
        Ok(())
    }
}
