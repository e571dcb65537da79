/**
 * Server Initialization
 *
 * Builds the Axum application: database pool, shared state, router.
 *
 * # Initialization Process
 *
 * 1. Connect the SQLite pool and run migrations
 * 2. Create `AppState` (presence registry, verifier, services)
 * 3. Create and configure the router
 */

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("[Server] Initializing utasks chat server");
    let pool = load_database(&config.database_url).await?;
    Ok(create_app_with_pool(pool, config))
}

/// Build the application over an already prepared pool
pub fn create_app_with_pool(pool: SqlitePool, config: ServerConfig) -> Router<()> {
    let app_state = AppState::new(pool, config);
    let app = create_router(app_state);
    tracing::info!("[Server] Router configured");
    app
}
