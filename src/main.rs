//! `ligado` binary.
//!
//! ```text
//! LIGADO_ADDR=127.0.0.1:3000 cargo run
//! curl http://localhost:3000/
//! curl -i -X POST http://localhost:3000/test \
//!      -H 'content-type: application/json' -d '{"a":1}'
//! ```

use clap::Parser;
use ligado::config::Config;
use ligado::{Server, routes};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ligado::Error> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|e| {
        eprintln!("invalid log filter `{}`: {e}", config.log);
        EnvFilter::new("ligado=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // An ambiguous table must stop the process before it binds.
    let app = routes::router().inspect_err(|e| error!("invalid route table: {e}"))?;

    Server::bind(config.addr)
        .await?
        .body_limit(config.body_limit)
        .serve(app)
        .await
}
