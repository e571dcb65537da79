/**
 * Message Store
 *
 * Durable, room-scoped log of chat messages in SQLite. Messages are only
 * ever created through the realtime gateway; edits rewrite content in place
 * and deletes remove the row.
 *
 * Timestamps are stored as microseconds since the Unix epoch so that range
 * queries and ordering are plain integer comparisons.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::{ChatMessage, RoomKey};

/// Convert a timestamp to its stored form
pub(crate) fn to_micros(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

/// Convert a stored timestamp back
pub(crate) fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

/// Current time truncated to storage precision
pub(crate) fn now() -> DateTime<Utc> {
    from_micros(to_micros(Utc::now()))
}

const MESSAGE_COLUMNS: &str = "id, sender_id, sender_username, recipient_id, group_id, content, room, created_at, edited, edited_at";

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: Uuid,
    sender_username: String,
    recipient_id: Option<Uuid>,
    group_id: Option<Uuid>,
    content: String,
    room: Option<String>,
    created_at: i64,
    edited: bool,
    edited_at: Option<i64>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: row.id,
            sender: row.sender_id,
            sender_username: row.sender_username,
            recipient: row.recipient_id,
            group_id: row.group_id,
            content: row.content,
            room: row.room,
            created_at: from_micros(row.created_at),
            edited: row.edited,
            edited_at: row.edited_at.map(from_micros),
        }
    }
}

/// A validated message about to be persisted
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender: Uuid,
    pub sender_username: String,
    pub recipient: Option<Uuid>,
    pub group_id: Option<Uuid>,
    /// Already trimmed and validated
    pub content: String,
    pub room: RoomKey,
}

/// Persist a new message
///
/// # Returns
/// The stored message, exactly as later reads will return it
pub async fn insert_message(pool: &SqlitePool, new: NewMessage) -> Result<ChatMessage, sqlx::Error> {
    let message = ChatMessage {
        id: Uuid::new_v4(),
        sender: new.sender,
        sender_username: new.sender_username,
        recipient: new.recipient,
        group_id: new.group_id,
        content: new.content,
        room: Some(new.room.to_string()),
        created_at: now(),
        edited: false,
        edited_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, sender_username, recipient_id, group_id, content, room, room_kind, created_at, edited, edited_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, NULL)
        "#,
    )
    .bind(message.id)
    .bind(message.sender)
    .bind(&message.sender_username)
    .bind(message.recipient)
    .bind(message.group_id)
    .bind(&message.content)
    .bind(&message.room)
    .bind(new.room.kind().as_str())
    .bind(to_micros(message.created_at))
    .execute(pool)
    .await?;

    Ok(message)
}

/// Get a message by ID
pub async fn get_message(pool: &SqlitePool, id: Uuid) -> Result<Option<ChatMessage>, sqlx::Error> {
    let row = sqlx::query_as::<_, MessageRow>(&format!(
        "SELECT {} FROM messages WHERE id = ?",
        MESSAGE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ChatMessage::from))
}

/// Rewrite the content of a message and stamp it as edited
///
/// # Returns
/// `true` if a row was updated
pub async fn update_message_content(
    pool: &SqlitePool,
    id: Uuid,
    content: &str,
    edited_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET content = ?, edited = 1, edited_at = ?
        WHERE id = ?
        "#,
    )
    .bind(content)
    .bind(to_micros(edited_at))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Physically remove a message
///
/// # Returns
/// `true` if a row was deleted
pub async fn delete_message(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Where a history page ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    /// The newest page
    Latest,
    /// Messages created strictly before an instant. Messages sharing the
    /// instant of the cutoff are excluded.
    Before(DateTime<Utc>),
    /// Messages ordered strictly before a stored message, including those
    /// with the same timestamp that were inserted earlier
    BeforeMessage { created_at: i64, seq: i64 },
}

impl PageCursor {
    fn bounds(self) -> (i64, i64) {
        match self {
            PageCursor::Latest => (i64::MAX, 0),
            PageCursor::Before(instant) => (to_micros(instant), 0),
            PageCursor::BeforeMessage { created_at, seq } => (created_at, seq),
        }
    }
}

/// Position of a message inside `room`, usable as a page cursor
pub async fn message_cursor(pool: &SqlitePool, room: &RoomKey, id: Uuid) -> Result<Option<PageCursor>, sqlx::Error> {
    let position: Option<(i64, i64)> =
        sqlx::query_as("SELECT created_at, rowid FROM messages WHERE id = ? AND room = ?")
            .bind(id)
            .bind(room.to_string())
            .fetch_optional(pool)
            .await?;

    Ok(position.map(|(created_at, seq)| PageCursor::BeforeMessage { created_at, seq }))
}

/// Page through the history of a room
///
/// Fetches the `limit` newest messages ordered before `cursor` by
/// `(created_at, rowid)`, then returns them oldest first.
pub async fn list_room_messages(
    pool: &SqlitePool,
    room: &RoomKey,
    limit: i64,
    cursor: PageCursor,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let (created_at, seq) = cursor.bounds();

    let rows = sqlx::query_as::<_, MessageRow>(&format!(
        r#"
        SELECT {}
        FROM messages
        WHERE room = ? AND (created_at < ? OR (created_at = ? AND rowid < ?))
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
        MESSAGE_COLUMNS
    ))
    .bind(room.to_string())
    .bind(created_at)
    .bind(created_at)
    .bind(seq)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut messages: Vec<ChatMessage> = rows.into_iter().map(ChatMessage::from).collect();
    messages.reverse();
    Ok(messages)
}

/// Latest message of every private room `user_id` takes part in, newest first
pub async fn recent_conversations(
    pool: &SqlitePool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MessageRow>(&format!(
        r#"
        SELECT {}
        FROM (
            SELECT *, rowid AS seq, ROW_NUMBER() OVER (PARTITION BY room ORDER BY created_at DESC, rowid DESC) AS rn
            FROM messages
            WHERE (sender_id = ? OR recipient_id = ?)
              AND recipient_id IS NOT NULL
              AND room IS NOT NULL
        )
        WHERE rn = 1
        ORDER BY created_at DESC, seq DESC
        LIMIT ?
        "#,
        MESSAGE_COLUMNS
    ))
    .bind(user_id)
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ChatMessage::from).collect())
}
