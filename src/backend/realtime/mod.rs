//! Real-time Module
//!
//! Live connections, presence and event fan-out.
//!
//! # Architecture
//!
//! - **`presence`** - `PresenceRegistry`: who is online, on which
//!   connections, subscribed to which rooms
//! - **`broadcast`** - Per-connection outboxes and best-effort delivery
//! - **`gateway`** - Connection state machine and inbound event handling
//! - **`socket`** - Axum WebSocket upgrade handler
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── presence.rs     - Presence registry and room table
//! ├── broadcast.rs    - Outbox type and delivery helpers
//! ├── gateway.rs      - Gateway and Session
//! └── socket.rs       - WebSocket transport
//! ```
//!
//! # Delivery
//!
//! Delivery is best effort: events reach whichever connections are live at
//! the moment of fan-out. History fetched over REST is the durable fallback.

/// Presence registry
pub mod presence;

/// Outboxes and fan-out helpers
pub mod broadcast;

/// Connection protocol
pub mod gateway;

/// WebSocket transport
pub mod socket;

pub use gateway::{ConnectionState, Gateway, Handshake, PendingConnection, Session};
pub use presence::{ConnectionId, PresenceRegistry};
pub use socket::websocket_handler;
