//! utasks-chat - Realtime chat core
//!
//! The chat side of the utasks task board: an authenticated WebSocket gateway
//! with multi-connection presence, private and group rooms, typing
//! indicators, a SQLite-backed message store, and the REST endpoints that
//! read history and manage groups.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types (events, messages, groups, room keys)
//! - **`backend`** - Axum server, gateway, presence registry, stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use utasks_chat::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Presence lives in one `PresenceRegistry` per application instance, shared
//! through `AppState`. Each socket runs its own reader loop and writer task.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
