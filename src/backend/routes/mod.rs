//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, CORS, health, socket
//! ├── chat_routes.rs  - /api/chat routes
//! └── api_routes.rs   - /api/groups routes
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use utasks_chat::backend::routes::create_router;
//! use utasks_chat::backend::server::{config::{memory_pool, ServerConfig}, AppState};
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let state = AppState::new(memory_pool().await?, ServerConfig::for_tests("secret"));
//! let router = create_router(state);
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// Chat routes
pub mod chat_routes;

/// Group routes
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
