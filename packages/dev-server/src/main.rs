//! Numtree dev server binary
//!
//! ```bash
//! # Throwaway in-memory store, one writer
//! NUMTREE_STORE=memory NUMTREE_SESSIONS=dev-token=alice@example.com \
//!     cargo run --bin numtree-dev-server
//!
//! curl -X POST localhost:3001/api/nodes \
//!     -H 'Authorization: Bearer dev-token' \
//!     -H 'Content-Type: application/json' \
//!     -d '{"value":"10"}'
//! ```
//!
//! See [`numtree_dev_server::config`] for every variable. `RUST_LOG` sets
//! the log level (default `info`).
//!
//! Development only: tokens are static and CORS is limited to localhost.

use numtree_dev_server::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🚀 Numtree HTTP Dev Server");

    let config = ServerConfig::from_env()?;
    tracing::info!("📡 Port: {}", config.port);

    start_server(config).await
}
