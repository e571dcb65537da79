//! Chat Handlers Module
//!
//! Axum handlers for the `/api/chat` endpoints. Every route sits behind
//! `auth_middleware` and reads the caller through the `AuthUser` extractor.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs          - Module exports and documentation
//! ├── history.rs      - History, conversations, online users
//! └── messages.rs     - Edit and delete
//! ```
//!
//! # Route Handlers
//!
//! - `GET /api/chat/history/{room}` - one page of a room, oldest first
//! - `GET /api/chat/private/{user_id}` - private conversation with a user
//! - `GET /api/chat/group/{group_id}` - group conversation
//! - `GET /api/chat/conversations` - latest message per private conversation
//! - `GET /api/chat/users/online` - presence snapshot
//! - `PUT /api/chat/messages/{id}` - edit own message
//! - `DELETE /api/chat/messages/{id}` - delete own message
//!
//! History endpoints accept `limit` (default 50, clamped to 1..=100) and
//! `before` (RFC 3339) query parameters. `beforeId` pages from a message id
//! and does not skip messages that share a timestamp.

/// Read-only history handlers
pub mod history;

/// Edit and delete handlers
pub mod messages;

pub use history::{get_conversations, get_group_history, get_online_users, get_private_history, get_room_history};
pub use messages::{delete_message, edit_message};
