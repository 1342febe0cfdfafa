//! Numtree Dev Server
//!
//! HTTP front end for browser development: REST endpoints for the node
//! operations and an SSE stream that pushes the evaluated forest after every
//! change. All behavior lives in `numtree-core`; this crate only maps HTTP
//! onto it.

pub mod config;
pub mod http_error;
pub mod routes;

pub use config::{ServerConfig, StoreKind};
pub use http_error::HttpError;
pub use routes::{create_router, AppState};

use anyhow::Context;
use axum::http::{header, Method};
use numtree_core::db::{InMemoryStore, NodeStore, TursoStore};
use numtree_core::services::{LiveForestService, NodeService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// CORS for the local frontend. `allow_origin` overrides the default Vite ports.
pub fn cors_layer(allow_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let origins: Vec<header::HeaderValue> = match allow_origin {
        Some(origin) => vec![origin
            .parse::<header::HeaderValue>()
            .with_context(|| format!("Invalid CORS_ALLOW_ORIGIN '{}'", origin))?],
        None => vec![
            header::HeaderValue::from_static("http://localhost:1420"),
            header::HeaderValue::from_static("http://localhost:5173"),
            header::HeaderValue::from_static("http://localhost:1421"),
        ],
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false))
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn NodeStore>> {
    Ok(match config.store {
        StoreKind::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StoreKind::Turso => {
            tracing::info!("Using database at {}", config.db_path.display());
            Arc::new(
                TursoStore::new(config.db_path.clone())
                    .await
                    .context("Failed to open database")?,
            )
        }
    })
}

/// Start the HTTP dev server
///
/// # Errors
///
/// Returns error if the store cannot be opened or the server fails to bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let node_service = NodeService::with_limits(store, config.limits)?;

    let live = LiveForestService::new(node_service.clone()).await?;
    let forest_rx = live.subscribe();
    tokio::spawn(live.run());

    if config.sessions.is_empty() {
        tracing::warn!("No sessions configured (NUMTREE_SESSIONS); all writes will be rejected");
    } else {
        tracing::info!("{} session(s) configured", config.sessions.len());
    }

    let state = AppState {
        node_service,
        sessions: Arc::new(config.sessions),
        forest_rx,
    };
    let app = create_router(state, cors_layer(config.cors_allow_origin.as_deref())?);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("🚀 Numtree dev server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_origins() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("http://localhost:8080")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
