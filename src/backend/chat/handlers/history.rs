//! History Handlers
//!
//! Read-only chat endpoints: room history, private and group history,
//! conversation list and the online roster.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::chat::service::{ChatService, HistoryQuery};
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::PresenceRegistry;
use crate::shared::{ApiResponse, ChatMessage, ConversationSummary, OnlineUser, RoomKey};

/// `GET /api/chat/history/{room}`
pub async fn get_room_history(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    Path(room): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> BackendResult<Json<ApiResponse<Vec<ChatMessage>>>> {
    let room: RoomKey = room.parse()?;
    let messages = chat.room_history(&identity, &room, &query).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// `GET /api/chat/private/{user_id}`
pub async fn get_private_history(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    Path(peer): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> BackendResult<Json<ApiResponse<Vec<ChatMessage>>>> {
    let messages = chat.private_history(&identity, peer, &query).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// `GET /api/chat/group/{group_id}`
pub async fn get_group_history(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    Path(group_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> BackendResult<Json<ApiResponse<Vec<ChatMessage>>>> {
    let messages = chat.group_history(&identity, group_id, &query).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// `GET /api/chat/conversations`
pub async fn get_conversations(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<ApiResponse<Vec<ConversationSummary>>>> {
    let conversations = chat.conversations(&identity).await?;
    Ok(Json(ApiResponse::ok(conversations)))
}

/// `GET /api/chat/users/online`
pub async fn get_online_users(
    State(presence): State<PresenceRegistry>,
    AuthUser(_identity): AuthUser,
) -> Json<ApiResponse<Vec<OnlineUser>>> {
    Json(ApiResponse::ok(presence.list_online().await))
}
