//! Chat Backend Module
//!
//! The message store and everything that reads or mutates stored messages
//! outside the realtime gateway.
//!
//! # Architecture
//!
//! - **`db`** - Message store (SQLite)
//! - **`service`** - History access rules, edit/delete with notifications
//! - **`handlers`** - Axum handlers for `/api/chat`
//!
//! Messages are created only by the gateway (`realtime::gateway`); this
//! module owns their history, edits and deletes.

/// Message persistence
pub mod db;

/// Chat rules and notifications
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use service::{ChatService, HistoryQuery};
