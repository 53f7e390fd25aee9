//! Axum router construction for the API server.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /ws` -- `WebSocket` weather stream
/// - `GET /health` -- liveness and subscriber count
/// - `GET /api/cities` -- configured cities
/// - `GET /api/weather` -- most recent broadcast
/// - `GET /api/history` -- recent observations
///
/// CORS allows any origin so browser dashboards can connect directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_weather))
        // Health
        .route("/health", get(handlers::health))
        // REST API
        .route("/api/cities", get(handlers::list_cities))
        .route("/api/weather", get(handlers::latest_weather))
        .route("/api/history", get(handlers::history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
