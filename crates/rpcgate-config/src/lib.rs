#![allow(clippy::must_use_candidate)]

pub mod gateway;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use gateway::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;

/// Top-level rpcgate configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Error rendering configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
