//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer-token authentication for the REST routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use utasks_chat::backend::middleware::auth_middleware;
//!
//! let protected = api.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser};
