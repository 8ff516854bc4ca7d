use std::path::PathBuf;

use clap::Parser;

/// rpcgate RPC-to-HTTP gateway
#[derive(Debug, Parser)]
#[command(name = "rpcgate", about = "Serve RPC backends over HTTP with structured error bodies")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "rpcgate.toml", env = "RPCGATE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RPCGATE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
