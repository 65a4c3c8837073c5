// HTTP and WebSocket APIs

pub mod query;
pub mod server;
pub mod websocket;

pub use query::{create_query_router, QueryAppState, StatusResponse};
pub use server::supervise_server;
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::broadcast::BroadcastService;
use crate::config::BroadcastConfig;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Full application router: live WebSocket feed plus read-only queries.
///
/// CORS is permissive; the dashboard is served from a different origin.
pub fn create_app(broadcast: Arc<BroadcastService>, config: &BroadcastConfig) -> Router {
    let ws_state = Arc::new(WsAppState {
        broadcast: Arc::clone(&broadcast),
        send_timeout: config.send_timeout(),
    });
    let query_state = Arc::new(QueryAppState {
        broadcast,
        interval_ms: config.interval_ms,
    });

    Router::new()
        .merge(create_ws_router(ws_state))
        .merge(create_query_router(query_state))
        .layer(CorsLayer::permissive())
}
