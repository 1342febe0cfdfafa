//! HTTP routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/health` | liveness |
//! | GET | `/api/nodes` | flat records, creation order |
//! | POST | `/api/nodes` | add a root or child (bearer token required) |
//! | DELETE | `/api/nodes` | clear everything (bearer token required) |
//! | GET | `/api/forest` | evaluated forest with diagnostics |
//! | GET | `/api/events` | SSE stream of forest views, one per change |

use crate::http_error::HttpError;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures::stream::Stream;
use numtree_core::models::NodeRecord;
use numtree_core::services::{NodeService, Session, SessionRegistry};
use numtree_core::{ForestSnapshot, ForestView};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub node_service: NodeService,
    pub sessions: Arc<SessionRegistry>,
    pub forest_rx: watch::Receiver<Arc<ForestSnapshot>>,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeRequest {
    pub value: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/nodes",
            get(list_nodes).post(create_node).delete(delete_all_nodes),
        )
        .route("/api/forest", get(get_forest))
        .route("/api/events", get(forest_events))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Resolve `Authorization: Bearer <token>` to a session, if any.
fn session_from_headers(headers: &HeaderMap, sessions: &SessionRegistry) -> Option<Session> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    sessions.authenticate(token)
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<NodeRecord>>, HttpError> {
    let records = state.node_service.list_all().await?;
    Ok(Json(records))
}

async fn create_node(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateNodeRequest>,
) -> Result<(StatusCode, Json<NodeRecord>), HttpError> {
    let session = session_from_headers(&headers, &state.sessions);
    let record = state
        .node_service
        .add_node(
            session.as_ref(),
            &request.value,
            request.parent_id.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_all_nodes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DeleteAllResponse>, HttpError> {
    let session = session_from_headers(&headers, &state.sessions);
    let deleted = state.node_service.delete_all(session.as_ref()).await?;
    Ok(Json(DeleteAllResponse { deleted }))
}

/// Computed from the store on each request, so a client sees its own write
/// even before the live snapshot catches up.
async fn get_forest(State(state): State<AppState>) -> Result<Json<ForestView>, HttpError> {
    let snapshot = state.node_service.snapshot().await?;
    Ok(Json(snapshot.view()))
}

/// Current view immediately, then one event per recomputed snapshot.
async fn forest_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.forest_rx.clone()).filter_map(|snapshot| {
        match serde_json::to_string(&snapshot.view()) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(e) => {
                tracing::error!("Failed to serialize forest view: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    )
}
