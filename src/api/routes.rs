//! API Routes
//!
//! Configures the Axum router with all link server endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_link_handler, delete_link_handler, edit_limit_handler, edit_ttl_handler,
    health_handler, info_handler, open_handler, owner_links_handler, register_owner_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /owners` - Register an owner id
/// - `GET /owners/:id/links` - List an owner's links
/// - `POST /links` - Create a short link (requires `X-Owner-Id`)
/// - `GET /links/:code` - Inspect a link without counting a click
/// - `DELETE /links/:code` - Delete an owned link
/// - `PATCH /links/:code/limit` - Change the click budget of an owned link
/// - `PATCH /links/:code/ttl` - Restart the TTL of an owned link
/// - `GET /r/:code` - Follow a short link
/// - `GET /stats` - Engine counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/owners", post(register_owner_handler))
        .route("/owners/:id/links", get(owner_links_handler))
        .route("/links", post(create_link_handler))
        .route("/links/:code", get(info_handler).delete(delete_link_handler))
        .route("/links/:code/limit", patch(edit_limit_handler))
        .route("/links/:code/ttl", patch(edit_ttl_handler))
        .route("/r/:code", get(open_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
