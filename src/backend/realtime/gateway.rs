/**
 * Realtime Gateway
 *
 * Per-connection protocol logic, independent of the socket transport. The
 * WebSocket handler in `socket.rs` owns the I/O; everything a frame can
 * cause happens here.
 *
 * # Connection Lifecycle
 *
 * ```text
 * Handshake          PendingConnection        Session
 * Connecting --verify--> Authenticated --open--> Active --close--> Closed
 *      |
 *      +-- verification failed: rejected, never registered
 * ```
 *
 * Each step consumes the previous value, so a connection cannot skip a state.
 *
 * # Error Reporting
 *
 * A failed event never affects other connections. The failure is rendered
 * as an `error` event and sent to the originating connection only.
 */

use sqlx::SqlitePool;
use std::fmt;

use crate::backend::auth::{Identity, IdentityVerifier};
use crate::backend::chat::db::{insert_message, NewMessage};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::groups::db::{get_group, is_member};
use crate::backend::realtime::broadcast::Outbox;
use crate::backend::realtime::presence::{ConnectionId, PresenceRegistry};
use crate::shared::event::{GroupMessagePayload, PrivateMessagePayload};
use crate::shared::message::validate_content;
use crate::shared::{ChatMessage, ClientEvent, RoomKey, ServerEvent, SharedError, TypingUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticated,
    Active,
    Closed,
}

/// Shared entry point for every realtime connection
#[derive(Clone)]
pub struct Gateway {
    pool: SqlitePool,
    presence: PresenceRegistry,
    verifier: IdentityVerifier,
}

impl Gateway {
    pub fn new(pool: SqlitePool, presence: PresenceRegistry, verifier: IdentityVerifier) -> Self {
        Self {
            pool,
            presence,
            verifier,
        }
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    /// Start a handshake (Connecting)
    pub fn accept(&self) -> Handshake {
        Handshake {
            gateway: self.clone(),
        }
    }

    /// Shorthand for `accept()` followed by `Handshake::authenticate`
    pub async fn authenticate(&self, credential: Option<&str>) -> BackendResult<PendingConnection> {
        self.accept().authenticate(credential).await
    }
}

/// A connection whose credential has not been checked yet
pub struct Handshake {
    gateway: Gateway,
}

impl Handshake {
    pub fn state(&self) -> ConnectionState {
        ConnectionState::Connecting
    }

    /// Verify the handshake credential (Connecting -> Authenticated)
    ///
    /// On failure the handshake is consumed and nothing is registered.
    pub async fn authenticate(self, credential: Option<&str>) -> BackendResult<PendingConnection> {
        let identity = self.gateway.verifier.verify(credential).await?;
        tracing::debug!("[Gateway] Handshake accepted for {}", identity.username);
        Ok(PendingConnection {
            identity,
            gateway: self.gateway,
        })
    }
}

/// An authenticated connection that is not yet visible to presence
pub struct PendingConnection {
    identity: Identity,
    gateway: Gateway,
}

impl fmt::Debug for PendingConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingConnection")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl PendingConnection {
    pub fn state(&self) -> ConnectionState {
        ConnectionState::Authenticated
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Register the connection (Authenticated -> Active)
    pub async fn open(self, outbox: Outbox) -> Session {
        let id = self.gateway.presence.register(self.identity.clone(), outbox).await;
        tracing::info!("[Gateway] {} connected as {}", self.identity.username, id);
        Session {
            id,
            identity: self.identity,
            state: ConnectionState::Active,
            gateway: self.gateway,
        }
    }
}

/// One active connection
pub struct Session {
    id: ConnectionId,
    identity: Identity,
    state: ConnectionState,
    gateway: Gateway,
}

impl Session {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Decode and handle one inbound text frame
    ///
    /// Failures are reported to this connection as an `error` event.
    pub async fn dispatch(&self, frame: &str) {
        let result = match ClientEvent::decode(frame) {
            Ok(event) => self.handle(event).await,
            Err(e) => Err(BackendError::from(e)),
        };

        if let Err(e) = result {
            if e.is_unexpected() {
                tracing::error!("[Gateway] Event from {} failed: {}", self.identity.username, e);
            } else {
                tracing::debug!("[Gateway] Event from {} rejected: {}", self.identity.username, e);
            }
            self.gateway
                .presence
                .send_to_connection(self.id, ServerEvent::from(&e))
                .await;
        }
    }

    /// Handle one decoded event
    pub async fn handle(&self, event: ClientEvent) -> BackendResult<()> {
        if self.state != ConnectionState::Active {
            return Err(BackendError::Unauthenticated);
        }

        match event {
            ClientEvent::PrivateMessage(payload) => self.send_private(payload).await.map(|_| ()),
            ClientEvent::GroupMessage(payload) => self.send_group(payload).await.map(|_| ()),
            ClientEvent::TypingStart(payload) => {
                self.typing(payload.room.as_deref(), true).await;
                Ok(())
            }
            ClientEvent::TypingStop(payload) => {
                self.typing(payload.room.as_deref(), false).await;
                Ok(())
            }
            ClientEvent::RoomJoin(payload) => self.join_room(payload.room_id.as_deref()).await,
            ClientEvent::RoomLeave(payload) => self.leave_room(payload.room_id.as_deref()).await,
        }
    }

    /// Persist a private message and deliver it to every connection of both
    /// participants
    async fn send_private(&self, payload: PrivateMessagePayload) -> BackendResult<ChatMessage> {
        let content = validate_content(&payload.content)?;
        let recipient = payload.recipient_id.ok_or_else(|| SharedError::missing("recipientId"))?;

        let room = RoomKey::private(self.identity.user_id, recipient);
        let message = insert_message(
            &self.gateway.pool,
            NewMessage {
                sender: self.identity.user_id,
                sender_username: self.identity.username.clone(),
                recipient: Some(recipient),
                group_id: None,
                content,
                room,
            },
        )
        .await?;

        let delivered = self
            .gateway
            .presence
            .send_to_users(
                &[self.identity.user_id, recipient],
                ServerEvent::PrivateMessageReceived(message.clone()),
            )
            .await;
        tracing::debug!("[Gateway] Private message {} reached {} connections", message.id, delivered);

        Ok(message)
    }

    /// Persist a group message and deliver it to the group room
    async fn send_group(&self, payload: GroupMessagePayload) -> BackendResult<ChatMessage> {
        let content = validate_content(&payload.content)?;
        let group_id = payload.group_id.ok_or_else(|| SharedError::missing("groupId"))?;

        let pool = &self.gateway.pool;
        let group = get_group(pool, group_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Group not found"))?;
        if !group.is_member(self.identity.user_id) {
            return Err(BackendError::NotAMember);
        }

        let room = RoomKey::group(group_id);
        let message = insert_message(
            pool,
            NewMessage {
                sender: self.identity.user_id,
                sender_username: self.identity.username.clone(),
                recipient: None,
                group_id: Some(group_id),
                content,
                room,
            },
        )
        .await?;

        let delivered = self
            .gateway
            .presence
            .send_to_room(&room, ServerEvent::GroupMessageReceived(message.clone()), None)
            .await;
        tracing::debug!("[Gateway] Group message {} reached {} connections", message.id, delivered);

        Ok(message)
    }

    /// Relay a typing indicator to the other connections in a joined room
    ///
    /// Missing, malformed or unjoined rooms are ignored without a reply.
    async fn typing(&self, room: Option<&str>, is_typing: bool) {
        let Some(room) = room.and_then(|raw| raw.parse::<RoomKey>().ok()) else {
            return;
        };
        let presence = &self.gateway.presence;
        if !presence.is_in_room(self.id, &room).await {
            return;
        }

        let update = ServerEvent::TypingUpdate(TypingUpdate {
            user_id: self.identity.user_id,
            username: self.identity.username.clone(),
            room,
            is_typing,
        });
        presence.send_to_room(&room, update, Some(self.id)).await;
    }

    async fn join_room(&self, room_id: Option<&str>) -> BackendResult<()> {
        let raw = room_id.ok_or_else(|| SharedError::missing("roomId"))?;
        let room: RoomKey = raw.parse()?;

        match room {
            RoomKey::Private { .. } => {
                if !room.involves(self.identity.user_id) {
                    return Err(BackendError::forbidden("Not authorized to join this room"));
                }
            }
            RoomKey::Group(group_id) => {
                if !is_member(&self.gateway.pool, group_id, self.identity.user_id).await? {
                    return Err(BackendError::NotAMember);
                }
            }
        }

        self.gateway.presence.join_room(self.id, room).await;
        tracing::debug!("[Gateway] {} joined {}", self.identity.username, room);
        Ok(())
    }

    async fn leave_room(&self, room_id: Option<&str>) -> BackendResult<()> {
        let raw = room_id.ok_or_else(|| SharedError::missing("roomId"))?;
        let room: RoomKey = raw.parse()?;
        self.gateway.presence.leave_room(self.id, &room).await;
        Ok(())
    }

    /// Unregister the connection (Active -> Closed). Idempotent.
    pub async fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;
        self.gateway.presence.unregister(self.id).await;
        tracing::info!("[Gateway] {} disconnected ({})", self.identity.username, self.id);
    }
}
