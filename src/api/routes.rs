//! API Routes
//!
//! Configures the Axum router with all cache node endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{groups_handler, health_handler, peer_get_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET {base_path}:group/:key` - Serve a cached value to a peer
/// - `GET /groups` - List registered groups
/// - `GET /stats/:group` - Get group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin on the JSON endpoints
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let peer_route = format!("{}:group/:key", state.base_path);

    let json_api = Router::new()
        .route("/groups", get(groups_handler))
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors);

    Router::new()
        .route(&peer_route, get(peer_get_handler))
        .merge(json_api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
