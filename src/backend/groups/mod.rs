//! Groups Module
//!
//! Named, persistent member sets that own a group chat room.
//!
//! - **`db`** - Group store (SQLite)
//! - **`service`** - Membership rules and realtime notifications
//! - **`handlers`** - Axum handlers for `/api/groups`
//!
//! Transport rooms mirror persisted membership: removing a member evicts
//! their connections from `group:<id>`, deleting the group closes it.

/// Group persistence
pub mod db;

/// Membership rules
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use service::GroupService;
