use serde::Deserialize;

/// Error rendering configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Indent JSON error bodies
    #[serde(default)]
    pub pretty_json: bool,
    /// Forward header metadata from failed calls as response headers
    #[serde(default = "default_forward_metadata")]
    pub forward_metadata: bool,
    /// Prefix for forwarded metadata header names
    #[serde(default = "default_metadata_header_prefix")]
    pub metadata_header_prefix: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            forward_metadata: true,
            metadata_header_prefix: default_metadata_header_prefix(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_forward_metadata() -> bool {
    true
}

fn default_metadata_header_prefix() -> String {
    "Grpc-Metadata-".to_string()
}
