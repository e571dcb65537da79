/**
 * Presence Registry
 *
 * The process-wide source of truth for who is online and which connections
 * are subscribed to which rooms. One registry is created per application
 * instance and handed to the gateway and the REST handlers; there is no
 * global.
 *
 * # Model
 *
 * - connection id -> (identity, outbox, joined rooms)
 * - user id -> set of connection ids (a user may hold many connections)
 * - room key -> set of connection ids
 *
 * # Consistency
 *
 * All three maps sit behind one `RwLock`. `register` and `unregister` perform
 * the mutation and the resulting presence broadcast under the same write
 * guard, so every snapshot sent reflects the state right after the mutation
 * that triggered it and no other mutation can interleave.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::Identity;
use crate::backend::realtime::broadcast::{broadcast_event, deliver, Outbox};
use crate::shared::{OnlineUser, PresenceChange, RoomKey, ServerEvent};

/// Handle of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ConnectionEntry {
    identity: Identity,
    outbox: Outbox,
    rooms: HashSet<RoomKey>,
}

#[derive(Default)]
struct PresenceTable {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    users: HashMap<Uuid, HashSet<ConnectionId>>,
    rooms: HashMap<RoomKey, HashSet<ConnectionId>>,
}

impl PresenceTable {
    fn snapshot(&self) -> Vec<OnlineUser> {
        let mut online: Vec<OnlineUser> = self
            .users
            .values()
            .filter_map(|ids| ids.iter().next())
            .filter_map(|id| self.connections.get(id))
            .map(|entry| OnlineUser {
                user_id: entry.identity.user_id,
                username: entry.identity.username.clone(),
            })
            .collect();
        online.sort_by(|a, b| a.username.cmp(&b.username).then(a.user_id.cmp(&b.user_id)));
        online
    }

    fn user_connections(&self, user_id: Uuid) -> impl Iterator<Item = &ConnectionId> {
        self.users.get(&user_id).into_iter().flatten()
    }

    fn room_connections(&self, room: &RoomKey) -> impl Iterator<Item = &ConnectionId> {
        self.rooms.get(room).into_iter().flatten()
    }

    fn send(&self, ids: &HashSet<ConnectionId>, event: &ServerEvent) -> usize {
        broadcast_event(
            ids.iter().filter_map(|id| self.connections.get(id)).map(|entry| &entry.outbox),
            event,
        )
    }

    fn send_all(&self, event: &ServerEvent) -> usize {
        broadcast_event(self.connections.values().map(|entry| &entry.outbox), event)
    }

    fn leave(&mut self, id: ConnectionId, room: &RoomKey) -> bool {
        let Some(entry) = self.connections.get_mut(&id) else {
            return false;
        };
        let removed = entry.rooms.remove(room);
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
        removed
    }
}

/// Injected, cheaply clonable registry handle
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    table: Arc<RwLock<PresenceTable>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for `identity`
    ///
    /// Other connections of the same user are kept. If the user was offline,
    /// every registered connection (the new one included) receives
    /// `user:connected`. The new connection then receives the `users:online`
    /// snapshot.
    pub async fn register(&self, identity: Identity, outbox: Outbox) -> ConnectionId {
        let id = ConnectionId::new();
        let mut table = self.table.write().await;

        let user_id = identity.user_id;
        let username = identity.username.clone();
        table.connections.insert(
            id,
            ConnectionEntry {
                identity,
                outbox: outbox.clone(),
                rooms: HashSet::new(),
            },
        );
        let sessions = table.users.entry(user_id).or_default();
        let came_online = sessions.is_empty();
        sessions.insert(id);

        let snapshot = table.snapshot();
        if came_online {
            tracing::info!("[Presence] {} ({}) is online", username, user_id);
            table.send_all(&ServerEvent::UserConnected(PresenceChange {
                user_id,
                username,
                connected_users: snapshot.clone(),
            }));
        } else {
            tracing::debug!("[Presence] {} opened another connection {}", username, id);
        }
        deliver(&outbox, ServerEvent::UsersOnline(snapshot));

        id
    }

    /// Remove exactly one connection
    ///
    /// Drops its room subscriptions. If it was the user's last connection,
    /// the remaining connections receive `user:disconnected`.
    ///
    /// # Returns
    ///
    /// The identity that owned the connection, or `None` if it was unknown
    pub async fn unregister(&self, id: ConnectionId) -> Option<Identity> {
        let mut table = self.table.write().await;

        let entry = table.connections.remove(&id)?;
        for room in &entry.rooms {
            if let Some(members) = table.rooms.get_mut(room) {
                members.remove(&id);
                if members.is_empty() {
                    table.rooms.remove(room);
                }
            }
        }

        let user_id = entry.identity.user_id;
        let went_offline = match table.users.get_mut(&user_id) {
            Some(sessions) => {
                sessions.remove(&id);
                sessions.is_empty()
            }
            None => true,
        };

        if went_offline {
            table.users.remove(&user_id);
            tracing::info!("[Presence] {} ({}) is offline", entry.identity.username, user_id);
            let change = PresenceChange {
                user_id,
                username: entry.identity.username.clone(),
                connected_users: table.snapshot(),
            };
            table.send_all(&ServerEvent::UserDisconnected(change));
        } else {
            tracing::debug!("[Presence] {} closed connection {}", entry.identity.username, id);
        }

        Some(entry.identity)
    }

    /// Connections currently registered for a user
    pub async fn lookup(&self, user_id: Uuid) -> Vec<ConnectionId> {
        let table = self.table.read().await;
        let mut ids: Vec<ConnectionId> = table.user_connections(user_id).copied().collect();
        ids.sort();
        ids
    }

    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.table.read().await.users.contains_key(&user_id)
    }

    /// Snapshot of online users, one entry per user
    pub async fn list_online(&self) -> Vec<OnlineUser> {
        self.table.read().await.snapshot()
    }

    pub async fn online_count(&self) -> usize {
        self.table.read().await.users.len()
    }

    /// Subscribe a connection to a room
    ///
    /// # Returns
    ///
    /// `false` if the connection is unknown
    pub async fn join_room(&self, id: ConnectionId, room: RoomKey) -> bool {
        let mut table = self.table.write().await;
        let Some(entry) = table.connections.get_mut(&id) else {
            return false;
        };
        entry.rooms.insert(room);
        table.rooms.entry(room).or_default().insert(id);
        true
    }

    /// Unsubscribe a connection from a room
    ///
    /// # Returns
    ///
    /// `true` if the connection was subscribed
    pub async fn leave_room(&self, id: ConnectionId, room: &RoomKey) -> bool {
        self.table.write().await.leave(id, room)
    }

    pub async fn is_in_room(&self, id: ConnectionId, room: &RoomKey) -> bool {
        self.table
            .read()
            .await
            .rooms
            .get(room)
            .is_some_and(|members| members.contains(&id))
    }

    /// Connections subscribed to a room
    pub async fn room_members(&self, room: &RoomKey) -> Vec<ConnectionId> {
        let table = self.table.read().await;
        let mut ids: Vec<ConnectionId> = table.room_connections(room).copied().collect();
        ids.sort();
        ids
    }

    /// Unsubscribe every connection of `user_id` from a room
    ///
    /// # Returns
    ///
    /// Number of connections removed
    pub async fn evict_user_from_room(&self, user_id: Uuid, room: &RoomKey) -> usize {
        let mut table = self.table.write().await;
        let ids: Vec<ConnectionId> = table.user_connections(user_id).copied().collect();
        ids.into_iter().filter(|id| table.leave(*id, room)).count()
    }

    /// Unsubscribe everyone from a room
    ///
    /// # Returns
    ///
    /// Number of connections removed
    pub async fn close_room(&self, room: &RoomKey) -> usize {
        let mut table = self.table.write().await;
        let Some(members) = table.rooms.remove(room) else {
            return 0;
        };
        for id in &members {
            if let Some(entry) = table.connections.get_mut(id) {
                entry.rooms.remove(room);
            }
        }
        members.len()
    }

    pub async fn send_to_connection(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let table = self.table.read().await;
        match table.connections.get(&id) {
            Some(entry) => deliver(&entry.outbox, event),
            None => false,
        }
    }

    /// Deliver to every connection of one user
    pub async fn send_to_user(&self, user_id: Uuid, event: ServerEvent) -> usize {
        self.send_to_users(&[user_id], event).await
    }

    /// Deliver to every connection of the given users, each connection once
    pub async fn send_to_users(&self, user_ids: &[Uuid], event: ServerEvent) -> usize {
        let table = self.table.read().await;
        let targets: HashSet<ConnectionId> = user_ids
            .iter()
            .flat_map(|user_id| table.user_connections(*user_id))
            .copied()
            .collect();
        table.send(&targets, &event)
    }

    /// Deliver to the subscribers of a room, optionally skipping one
    /// connection
    pub async fn send_to_room(&self, room: &RoomKey, event: ServerEvent, except: Option<ConnectionId>) -> usize {
        let table = self.table.read().await;
        let targets: HashSet<ConnectionId> = table
            .room_connections(room)
            .filter(|id| except != Some(**id))
            .copied()
            .collect();
        table.send(&targets, &event)
    }

    /// Deliver to the subscribers of a room plus every connection of the
    /// given users, each connection once
    pub async fn send_to_audience(&self, room: &RoomKey, user_ids: &[Uuid], event: ServerEvent) -> usize {
        let table = self.table.read().await;
        let targets: HashSet<ConnectionId> = table
            .room_connections(room)
            .chain(user_ids.iter().flat_map(|user_id| table.user_connections(*user_id)))
            .copied()
            .collect();
        table.send(&targets, &event)
    }

    /// Deliver to every registered connection
    pub async fn broadcast_all(&self, event: ServerEvent) -> usize {
        self.table.read().await.send_all(&event)
    }
}
