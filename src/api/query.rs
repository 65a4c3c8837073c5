use crate::broadcast::BroadcastService;
use crate::state::{Camera, DangerZone, MonitoredRiver, Snapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the read-only query API
pub struct QueryAppState {
    pub broadcast: Arc<BroadcastService>,
    pub interval_ms: u64,
}

/// Broadcast loop status
#[derive(Serialize)]
pub struct StatusResponse {
    pub subscribers: usize,
    pub ticks: u64,
    pub deliveries: u64,
    pub dropped_subscribers: u64,
    pub interval_ms: u64,
    pub started_at: DateTime<Utc>,
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create query API router
pub fn create_query_router(state: Arc<QueryAppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/snapshot", get(snapshot))
        .route("/api/rivers/:id", get(get_river))
        .route("/api/zones/:id", get(get_zone))
        .route("/api/cameras/:id", get(get_camera))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/status - subscriber count and tick counters
async fn status(State(state): State<Arc<QueryAppState>>) -> Json<StatusResponse> {
    let metrics = state.broadcast.metrics.get_snapshot();
    Json(StatusResponse {
        subscribers: state.broadcast.subscriber_count(),
        ticks: metrics.ticks,
        deliveries: metrics.deliveries,
        dropped_subscribers: metrics.dropped_subscribers,
        interval_ms: state.interval_ms,
        started_at: metrics.started_at,
        last_tick_at: metrics.last_tick_at,
    })
}

/// GET /api/snapshot - current snapshot, same shape as the live push minus `type`
async fn snapshot(State(state): State<Arc<QueryAppState>>) -> Json<Snapshot> {
    Json(state.broadcast.current().as_ref().clone())
}

/// GET /api/rivers/:id
async fn get_river(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<u32>,
) -> Result<Json<MonitoredRiver>, QueryError> {
    let current = state.broadcast.current();
    current
        .rivers
        .iter()
        .find(|river| river.id == id)
        .cloned()
        .map(Json)
        .ok_or(QueryError::NotFound("River"))
}

/// GET /api/zones/:id
async fn get_zone(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<DangerZone>, QueryError> {
    let current = state.broadcast.current();
    current
        .zones
        .iter()
        .find(|zone| zone.id == id)
        .cloned()
        .map(Json)
        .ok_or(QueryError::NotFound("Zone"))
}

/// GET /api/cameras/:id
async fn get_camera(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Camera>, QueryError> {
    let current = state.broadcast.current();
    current
        .cameras
        .iter()
        .find(|camera| camera.id == id)
        .cloned()
        .map(Json)
        .ok_or(QueryError::NotFound("Camera"))
}

/// Query error types
#[derive(Debug)]
enum QueryError {
    NotFound(&'static str),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            QueryError::NotFound(kind) => (StatusCode::NOT_FOUND, format!("{} not found", kind)),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}
