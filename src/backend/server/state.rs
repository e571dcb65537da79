/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once per application instance and cloned into every
 * handler. It holds:
 * - The SQLite pool
 * - The presence registry (the only in-memory shared state)
 * - The identity verifier
 * - The services built on top of those
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers and middleware extract just the
 * part they need, e.g. `State(groups): State<GroupService>`.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::IdentityVerifier;
use crate::backend::chat::service::ChatService;
use crate::backend::groups::service::GroupService;
use crate::backend::realtime::{Gateway, PresenceRegistry};
use crate::backend::server::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,

    /// Who is online and which rooms each connection joined
    pub presence: PresenceRegistry,

    /// Shared by REST middleware and the socket handshake
    pub verifier: IdentityVerifier,

    pub gateway: Gateway,
    pub chat: ChatService,
    pub groups: GroupService,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire every service over one pool and one presence registry
    pub fn new(pool: SqlitePool, config: ServerConfig) -> Self {
        let presence = PresenceRegistry::new();
        let verifier = IdentityVerifier::new(config.jwt_secret.as_str(), pool.clone());

        Self {
            gateway: Gateway::new(pool.clone(), presence.clone(), verifier.clone()),
            chat: ChatService::new(pool.clone(), presence.clone()),
            groups: GroupService::new(pool.clone(), presence.clone()),
            pool,
            presence,
            verifier,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for IdentityVerifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for Gateway {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.gateway.clone()
    }
}

impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for GroupService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.groups.clone()
    }
}
