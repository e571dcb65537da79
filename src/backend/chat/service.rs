/**
 * Chat Service
 *
 * History reads and the REST-triggered message mutations. Edits and deletes
 * are pushed to live connections after the store write succeeds.
 *
 * # Notification Audience
 *
 * The subscribers of the message's room plus, for a private room, every
 * connection of both participants, each connection once. A message whose
 * room is missing or unreadable (rows written before rooms existed) falls
 * back to a broadcast to every connection.
 */

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::Identity;
use crate::backend::chat::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::groups::db::get_group;
use crate::backend::realtime::PresenceRegistry;
use crate::shared::message::validate_content;
use crate::shared::{ChatMessage, ConversationSummary, DeletedMessage, RoomKey, ServerEvent};

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 100;
pub const MAX_CONVERSATIONS: i64 = 20;

/// Pagination query for history endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    /// Only messages created strictly before this instant
    #[serde(default)]
    pub before: Option<DateTime<Utc>>,
    /// Only messages stored before this one. Takes precedence over `before`
    /// and keeps messages that share its timestamp.
    #[serde(default, rename = "beforeId")]
    pub before_id: Option<Uuid>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Clone)]
pub struct ChatService {
    pool: SqlitePool,
    presence: PresenceRegistry,
}

impl ChatService {
    pub fn new(pool: SqlitePool, presence: PresenceRegistry) -> Self {
        Self { pool, presence }
    }

    /// Check that `actor` may read `room`
    ///
    /// Private rooms must involve the actor; group rooms require a current
    /// membership in an existing group.
    pub async fn authorize_room(&self, actor: &Identity, room: &RoomKey) -> BackendResult<()> {
        match room {
            RoomKey::Private { .. } => {
                if room.involves(actor.user_id) {
                    Ok(())
                } else {
                    Err(BackendError::forbidden("Not authorized to read this conversation"))
                }
            }
            RoomKey::Group(group_id) => {
                let group = get_group(&self.pool, *group_id)
                    .await?
                    .ok_or_else(|| BackendError::not_found("Group not found"))?;
                if group.is_member(actor.user_id) {
                    Ok(())
                } else {
                    Err(BackendError::NotAMember)
                }
            }
        }
    }

    /// One page of a room's history, oldest first
    pub async fn room_history(
        &self,
        actor: &Identity,
        room: &RoomKey,
        query: &HistoryQuery,
    ) -> BackendResult<Vec<ChatMessage>> {
        self.authorize_room(actor, room).await?;
        let cursor = match (query.before_id, query.before) {
            (Some(id), _) => db::message_cursor(&self.pool, room, id)
                .await?
                .ok_or_else(|| BackendError::not_found("Message not found"))?,
            (None, Some(instant)) => db::PageCursor::Before(instant),
            (None, None) => db::PageCursor::Latest,
        };
        let messages = db::list_room_messages(&self.pool, room, query.effective_limit(), cursor).await?;
        Ok(messages)
    }

    /// History of the private conversation between `actor` and `peer`
    pub async fn private_history(
        &self,
        actor: &Identity,
        peer: Uuid,
        query: &HistoryQuery,
    ) -> BackendResult<Vec<ChatMessage>> {
        self.room_history(actor, &RoomKey::private(actor.user_id, peer), query)
            .await
    }

    pub async fn group_history(
        &self,
        actor: &Identity,
        group_id: Uuid,
        query: &HistoryQuery,
    ) -> BackendResult<Vec<ChatMessage>> {
        self.room_history(actor, &RoomKey::group(group_id), query).await
    }

    /// Latest message of each private conversation, newest first
    pub async fn conversations(&self, actor: &Identity) -> BackendResult<Vec<ConversationSummary>> {
        let latest = db::recent_conversations(&self.pool, actor.user_id, MAX_CONVERSATIONS).await?;
        Ok(latest
            .into_iter()
            .filter_map(|message| {
                let room = message.room.clone()?;
                let peer = message.room_key().and_then(|key| key.peer_of(actor.user_id));
                Some(ConversationSummary {
                    room_id: room,
                    peer,
                    last_message: message,
                })
            })
            .collect())
    }

    async fn require_own_message(&self, actor: &Identity, id: Uuid, verb: &str) -> BackendResult<ChatMessage> {
        let message = db::get_message(&self.pool, id)
            .await?
            .ok_or_else(|| BackendError::not_found("Message not found"))?;
        if message.sender != actor.user_id {
            return Err(BackendError::forbidden(format!("Not authorized to {} this message", verb)));
        }
        Ok(message)
    }

    /// Rewrite a message's content. Sender only.
    pub async fn edit_message(&self, actor: &Identity, id: Uuid, content: &str) -> BackendResult<ChatMessage> {
        let mut message = self.require_own_message(actor, id, "edit").await?;
        let content = validate_content(content)?;

        let edited_at = db::now();
        if !db::update_message_content(&self.pool, id, &content, edited_at).await? {
            return Err(BackendError::not_found("Message not found"));
        }
        message.content = content;
        message.edited = true;
        message.edited_at = Some(edited_at);
        tracing::info!("[Chat] {} edited message {}", actor.username, id);

        self.notify(&message, ServerEvent::MessageUpdated(message.clone())).await;
        Ok(message)
    }

    /// Physically delete a message. Sender only.
    pub async fn delete_message(&self, actor: &Identity, id: Uuid) -> BackendResult<DeletedMessage> {
        let message = self.require_own_message(actor, id, "delete").await?;

        if !db::delete_message(&self.pool, id).await? {
            return Err(BackendError::not_found("Message not found"));
        }
        tracing::info!("[Chat] {} deleted message {}", actor.username, id);

        let deleted = DeletedMessage::from(&message);
        self.notify(&message, ServerEvent::MessageDeleted(deleted.clone())).await;
        Ok(deleted)
    }

    async fn notify(&self, message: &ChatMessage, event: ServerEvent) -> usize {
        match message.room_key() {
            Some(room) => {
                let participants = match room {
                    RoomKey::Private { low, high } => vec![low, high],
                    RoomKey::Group(_) => Vec::new(),
                };
                self.presence.send_to_audience(&room, &participants, event).await
            }
            None => {
                tracing::warn!(
                    "[Chat] Message {} has no usable room ({:?}); broadcasting {} to everyone",
                    message.id,
                    message.room,
                    event.name()
                );
                self.presence.broadcast_all(event).await
            }
        }
    }
}
