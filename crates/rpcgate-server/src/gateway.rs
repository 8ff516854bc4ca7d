use rpcgate_config::GatewayConfig;
use rpcgate_runtime::{Gateway, JsonMarshaler, prefix_header_matcher};

/// Build the error rendering gateway described by configuration
pub fn build_gateway(config: &GatewayConfig) -> Gateway {
    let marshaler = if config.pretty_json {
        JsonMarshaler::pretty()
    } else {
        JsonMarshaler::new()
    };

    let builder = Gateway::builder().marshaler(marshaler);

    if config.forward_metadata {
        builder
            .with_header_matcher(prefix_header_matcher(config.metadata_header_prefix.clone()))
            .build()
    } else {
        builder.header_matcher(|_| None).build()
    }
}
