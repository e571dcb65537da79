//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the realtime gateway and
//! presence registry, and the SQLite stores behind them.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`auth`** - Token verification and user lookup
//! - **`middleware`** - REST authentication
//! - **`realtime`** - Presence, gateway, WebSocket transport
//! - **`chat`** - Message store, history, edit/delete
//! - **`groups`** - Group store and membership rules
//! - **`error`** - Backend error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Identity verification
//! ├── middleware/     - Request middleware
//! ├── realtime/       - Presence and gateway
//! ├── chat/           - Messages
//! ├── groups/         - Groups
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the pool, one `PresenceRegistry`, the verifier and the
//! services. Presence is the only shared in-memory state; everything else is
//! in SQLite.

/// Server initialization and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication
pub mod auth;

/// Request middleware
pub mod middleware;

/// Presence and realtime gateway
pub mod realtime;

/// Chat messages
pub mod chat;

/// Groups
pub mod groups;

/// Backend error types
pub mod error;
