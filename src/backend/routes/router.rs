/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all routes into a single Axum router.
 *
 * # Routes
 *
 * - `GET /messages` - WebSocket chat endpoint (authenticated handshake)
 * - `GET /health` - Liveness probe with the current online count
 *
 * # Layers
 *
 * - `TraceLayer` - request spans through `tracing`
 * - `CorsLayer::permissive()` - browser clients on other origins
 */

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the chat hub and identity gate
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/messages", get(handle_socket_upgrade))
        .route("/health", get(health))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Liveness probe
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let online = state.hub.presence().online_user_ids().await.len();
    Json(serde_json::json!({
        "status": "ok",
        "online": online,
    }))
}
