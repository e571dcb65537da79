/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Layout
 *
 * 1. Public routes: `GET /health`, `GET /ws` (the socket authenticates its
 *    own handshake)
 * 2. Protected routes: `/api/chat` and `/api/groups`, behind
 *    `auth_middleware`
 * 3. Fallback: JSON 404
 *
 * CORS allows the configured frontend origin.
 */

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::{websocket_handler, PresenceRegistry};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = configure_api_routes(configure_chat_routes(Router::new()))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    let cors = cors_layer(&app_state.config.frontend_url);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(websocket_handler))
        .merge(protected)
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(cors)
        .with_state(app_state)
}

/// `GET /health`
async fn health(State(presence): State<PresenceRegistry>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "onlineUsers": presence.online_count().await,
    }))
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => layer.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            tracing::warn!("[Server] FRONTEND_URL {:?} is not a valid origin; allowing any", frontend_url);
            layer.allow_origin(Any)
        }
    }
}
