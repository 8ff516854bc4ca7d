use indexmap::IndexMap;

/// Response metadata collected while an RPC call runs
///
/// Holds the entries the backend wants surfaced as HTTP headers and as
/// HTTP trailers. Keys are stored lowercased; insertion order is kept for
/// both keys and values. One carrier belongs to exactly one request and is
/// looked up from that request's extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerMetadata {
    header: IndexMap<String, Vec<String>>,
    trailer: IndexMap<String, Vec<String>>,
}

impl ServerMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value to be sent as a response header
    pub fn append_header(&mut self, key: &str, value: impl Into<String>) {
        self.header.entry(key.to_ascii_lowercase()).or_default().push(value.into());
    }

    /// Queue a value to be sent as a response trailer
    pub fn append_trailer(&mut self, key: &str, value: impl Into<String>) {
        self.trailer.entry(key.to_ascii_lowercase()).or_default().push(value.into());
    }

    /// Builder form of [`Self::append_header`]
    #[must_use]
    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.append_header(key, value);
        self
    }

    /// Builder form of [`Self::append_trailer`]
    #[must_use]
    pub fn with_trailer(mut self, key: &str, value: impl Into<String>) -> Self {
        self.append_trailer(key, value);
        self
    }

    /// Pending header entries in insertion order
    pub fn header(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.header.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Pending trailer entries in insertion order
    pub fn trailer(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.trailer.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.trailer.is_empty()
    }

    /// Metadata attached to a request, if the RPC runtime stored any
    pub fn from_extensions(extensions: &http::Extensions) -> Option<&Self> {
        extensions.get::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_lowercased_and_values_grouped() {
        let md = ServerMetadata::new()
            .with_header("X-Request-Id", "a")
            .with_header("x-request-id", "b")
            .with_trailer("Checksum", "c");

        let header: Vec<_> = md.header().collect();
        assert_eq!(header, vec![("x-request-id", &["a".to_owned(), "b".to_owned()][..])]);

        let trailer: Vec<_> = md.trailer().map(|(k, _)| k).collect();
        assert_eq!(trailer, vec!["checksum"]);
    }

    #[test]
    fn lookup_from_extensions() {
        let mut extensions = http::Extensions::new();
        assert!(ServerMetadata::from_extensions(&extensions).is_none());

        extensions.insert(ServerMetadata::new().with_header("k", "v"));
        let md = ServerMetadata::from_extensions(&extensions).unwrap();
        assert!(!md.is_empty());
    }
}
