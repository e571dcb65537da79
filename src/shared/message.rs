//! Chat Message Data Structures
//!
//! `ChatMessage` is the persisted representation of a message and also what
//! the gateway pushes to clients. Sender display names are denormalized onto
//! the message so history reads never need a join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::room::RoomKey;

/// Maximum message length, in characters, after trimming
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender: Uuid,
    /// Sender display name at send time
    pub sender_username: String,
    /// Recipient of a private message
    pub recipient: Option<Uuid>,
    /// Group of a group message
    pub group_id: Option<Uuid>,
    /// Trimmed message text
    pub content: String,
    /// Room key string. `None` only for rows written before rooms existed.
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Resolve the room this message lives in, if the stored key is valid
    pub fn room_key(&self) -> Option<RoomKey> {
        self.room.as_deref().and_then(|room| room.parse().ok())
    }
}

/// Identifying fields of a message that was deleted. Carries no content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMessage {
    pub id: Uuid,
    pub sender: Uuid,
    pub sender_username: String,
    pub recipient: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for DeletedMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            sender: message.sender,
            sender_username: message.sender_username.clone(),
            recipient: message.recipient,
            group_id: message.group_id,
            room: message.room.clone(),
            created_at: message.created_at,
        }
    }
}

/// Latest message of a private conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub room_id: String,
    /// The other participant, seen from the caller
    pub peer: Option<Uuid>,
    pub last_message: ChatMessage,
}

/// Trim and validate message content.
///
/// Returns the trimmed text or `InvalidContent` when it is empty or longer
/// than [`MAX_CONTENT_CHARS`].
pub fn validate_content(content: &str) -> Result<String, SharedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SharedError::invalid_content("Message content is required"));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(SharedError::invalid_content(format!(
            "Message content exceeds {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}
