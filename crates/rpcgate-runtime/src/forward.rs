use std::sync::Arc;

use http::header::{self, HeaderName, HeaderValue};
use rpcgate_core::ServerMetadata;

use crate::ResponseWriter;

/// Prefix applied to forwarded metadata headers by the default matcher
pub const METADATA_HEADER_PREFIX: &str = "Grpc-Metadata-";

/// Prefix applied to every forwarded metadata trailer
pub const METADATA_TRAILER_PREFIX: &str = "Grpc-Trailer-";

/// Maps a metadata key to the HTTP header it is sent as
///
/// Returning `None` drops the entry.
pub type HeaderMatcher = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Forward every key under [`METADATA_HEADER_PREFIX`]
pub fn default_header_matcher() -> HeaderMatcher {
    prefix_header_matcher(METADATA_HEADER_PREFIX)
}

/// Forward every key under a custom prefix
pub fn prefix_header_matcher(prefix: impl Into<String>) -> HeaderMatcher {
    let prefix = prefix.into();
    Arc::new(move |key: &str| Some(format!("{prefix}{key}")))
}

/// Copy queued header metadata onto the response headers
pub(crate) fn forward_header_metadata(
    w: &mut dyn ResponseWriter,
    matcher: &HeaderMatcher,
    metadata: Option<&ServerMetadata>,
) {
    let Some(metadata) = metadata else {
        return;
    };

    for (key, values) in metadata.header() {
        let Some(name) = matcher(key) else {
            continue;
        };
        let Some(name) = parse_name(&name) else {
            continue;
        };
        append_all(w.headers_mut(), &name, values);
    }
}

/// Declare every queued trailer in the `Trailer` header
///
/// Keys that do not form a valid header name are skipped here and in
/// [`forward_trailer_metadata`], so every declared name is also sent.
pub(crate) fn declare_trailers(w: &mut dyn ResponseWriter, metadata: Option<&ServerMetadata>) {
    let Some(metadata) = metadata else {
        return;
    };

    for (key, _) in metadata.trailer() {
        let declared = format!("{METADATA_TRAILER_PREFIX}{key}");
        if parse_name(&declared).is_none() {
            continue;
        }
        match HeaderValue::try_from(declared) {
            Ok(value) => {
                w.headers_mut().append(header::TRAILER, value);
            }
            Err(e) => tracing::warn!(key, error = %e, "skipping trailer with invalid name"),
        }
    }
}

/// Copy queued trailer metadata onto the response trailers
pub(crate) fn forward_trailer_metadata(w: &mut dyn ResponseWriter, metadata: Option<&ServerMetadata>) {
    let Some(metadata) = metadata else {
        return;
    };

    for (key, values) in metadata.trailer() {
        let Some(name) = parse_name(&format!("{METADATA_TRAILER_PREFIX}{key}")) else {
            continue;
        };
        append_all(w.trailers_mut(), &name, values);
    }
}

fn parse_name(name: &str) -> Option<HeaderName> {
    HeaderName::try_from(name)
        .inspect_err(|e| tracing::warn!(name, error = %e, "skipping metadata with invalid header name"))
        .ok()
}

fn append_all(map: &mut http::HeaderMap, name: &HeaderName, values: &[String]) {
    for value in values {
        match HeaderValue::try_from(value.as_str()) {
            Ok(value) => {
                map.append(name.clone(), value);
            }
            Err(e) => tracing::warn!(%name, error = %e, "skipping metadata with invalid header value"),
        }
    }
}
