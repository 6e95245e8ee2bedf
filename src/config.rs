//! Process configuration, from flags or environment.

use std::net::SocketAddr;

use clap::Parser;

use crate::middleware::body::DEFAULT_LIMIT;

/// Settings for the `ligado` binary. Every flag falls back to an
/// environment variable, then to a default.
#[derive(Debug, Clone, Parser)]
#[command(name = "ligado", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "LIGADO_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Maximum request body size in bytes.
    #[arg(long, env = "LIGADO_BODY_LIMIT", default_value_t = DEFAULT_LIMIT)]
    pub body_limit: usize,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax.
    #[arg(long, env = "LIGADO_LOG", default_value = "ligado=info")]
    pub log: String,
}
