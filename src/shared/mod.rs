//! Shared Module
//!
//! Wire types exchanged between the chat server and its clients: realtime
//! events, messages, groups, room keys and the REST response envelope. Nothing
//! in here touches the database or the network.
//!
//! # Overview
//!
//! - **`event`** - Closed `ClientEvent` / `ServerEvent` unions
//! - **`message`** - `ChatMessage` and content validation
//! - **`group`** - `Group` views and request bodies
//! - **`room`** - `RoomKey`, the typed room identifier
//! - **`response`** - `ApiResponse` envelope
//! - **`error`** - `SharedError` validation failures

/// Message data structure
pub mod message;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Group data structures
pub mod group;

/// Room keys
pub mod room;

/// REST response envelope
pub mod response;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use event::{
    ClientEvent, ErrorPayload, GroupDeletion, GroupMembershipChange, OnlineUser, PresenceChange, ServerEvent,
    TypingUpdate,
};
pub use group::{AddMembersRequest, CreateGroupRequest, Group, GroupMember, UpdateGroupRequest};
pub use message::{ChatMessage, ConversationSummary, DeletedMessage};
pub use response::ApiResponse;
pub use room::{RoomKey, RoomKind};
