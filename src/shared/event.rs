/**
 * Realtime Event System
 *
 * This module defines the closed set of events exchanged over a realtime
 * connection. Both directions use the same envelope:
 *
 * ```json
 * {"event": "message:private", "data": {"content": "hi", "recipientId": "..."}}
 * ```
 *
 * Inbound frames decode into `ClientEvent`; anything that is not one of the
 * known events, or whose payload has the wrong shape, is rejected with a
 * validation error before any side effect. Outbound notifications are
 * `ServerEvent` values serialized with the same envelope.
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::group::Group;
use crate::shared::message::{ChatMessage, DeletedMessage};
use crate::shared::room::RoomKey;

/// Payload of `message:private`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessagePayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
}

/// Payload of `message:group`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessagePayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

/// Payload of `typing:start` and `typing:stop`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingPayload {
    #[serde(default)]
    pub room: Option<String>,
}

/// Payload of `room:join` and `room:leave`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Events a client may send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "message:private")]
    PrivateMessage(PrivateMessagePayload),
    #[serde(rename = "message:group")]
    GroupMessage(GroupMessagePayload),
    #[serde(rename = "typing:start")]
    TypingStart(TypingPayload),
    #[serde(rename = "typing:stop")]
    TypingStop(TypingPayload),
    #[serde(rename = "room:join")]
    RoomJoin(RoomPayload),
    #[serde(rename = "room:leave")]
    RoomLeave(RoomPayload),
}

impl ClientEvent {
    /// Decode an inbound text frame
    ///
    /// A frame that is not JSON is a `SerializationError`. An absent or null
    /// `data` reads as an empty payload, so `{"event":"typing:start"}` decodes
    /// with no room. Unknown events and ill-typed payloads are validation
    /// errors on `event`.
    pub fn decode(frame: &str) -> Result<Self, SharedError> {
        let mut value: Value = serde_json::from_str(frame)?;
        if let Value::Object(envelope) = &mut value {
            let data = envelope.entry("data").or_insert(Value::Null);
            if data.is_null() {
                *data = Value::Object(Map::new());
            }
        }
        serde_json::from_value(value).map_err(|e| SharedError::validation("event", e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::PrivateMessage(_) => "message:private",
            ClientEvent::GroupMessage(_) => "message:group",
            ClientEvent::TypingStart(_) => "typing:start",
            ClientEvent::TypingStop(_) => "typing:stop",
            ClientEvent::RoomJoin(_) => "room:join",
            ClientEvent::RoomLeave(_) => "room:leave",
        }
    }
}

/// A user currently online
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Presence delta plus the full snapshot taken right after it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceChange {
    pub user_id: Uuid,
    pub username: String,
    pub connected_users: Vec<OnlineUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingUpdate {
    pub user_id: Uuid,
    pub username: String,
    pub room: RoomKey,
    pub is_typing: bool,
}

/// A membership change of one user in one group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembershipChange {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub group: Option<Group>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupDeletion {
    pub group_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: String,
}

/// Events the server pushes to connections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "user:connected")]
    UserConnected(PresenceChange),
    #[serde(rename = "user:disconnected")]
    UserDisconnected(PresenceChange),
    #[serde(rename = "users:online")]
    UsersOnline(Vec<OnlineUser>),
    #[serde(rename = "message:private:received")]
    PrivateMessageReceived(ChatMessage),
    #[serde(rename = "message:group:received")]
    GroupMessageReceived(ChatMessage),
    #[serde(rename = "message:private:updated")]
    MessageUpdated(ChatMessage),
    #[serde(rename = "message:private:deleted")]
    MessageDeleted(DeletedMessage),
    #[serde(rename = "typing:update")]
    TypingUpdate(TypingUpdate),
    #[serde(rename = "group:member:added")]
    GroupMemberAdded(GroupMembershipChange),
    #[serde(rename = "group:member:removed")]
    GroupMemberRemoved(GroupMembershipChange),
    #[serde(rename = "group:deleted")]
    GroupDeleted(GroupDeletion),
    #[serde(rename = "error")]
    Error(ErrorPayload),
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Wire name of the event, used for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserConnected(_) => "user:connected",
            ServerEvent::UserDisconnected(_) => "user:disconnected",
            ServerEvent::UsersOnline(_) => "users:online",
            ServerEvent::PrivateMessageReceived(_) => "message:private:received",
            ServerEvent::GroupMessageReceived(_) => "message:group:received",
            ServerEvent::MessageUpdated(_) => "message:private:updated",
            ServerEvent::MessageDeleted(_) => "message:private:deleted",
            ServerEvent::TypingUpdate(_) => "typing:update",
            ServerEvent::GroupMemberAdded(_) => "group:member:added",
            ServerEvent::GroupMemberRemoved(_) => "group:member:removed",
            ServerEvent::GroupDeleted(_) => "group:deleted",
            ServerEvent::Error(_) => "error",
        }
    }
}
