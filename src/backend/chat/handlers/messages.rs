//! Message Mutation Handlers
//!
//! `PUT` and `DELETE` on a single message. Only the sender may do either;
//! live connections are notified by the chat service.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::shared::{ApiResponse, ChatMessage, DeletedMessage};

#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// `PUT /api/chat/messages/{id}`
pub async fn edit_message(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EditMessageRequest>,
) -> BackendResult<Json<ApiResponse<ChatMessage>>> {
    let message = chat.edit_message(&identity, id, &request.content).await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// `DELETE /api/chat/messages/{id}`
pub async fn delete_message(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<ApiResponse<DeletedMessage>>> {
    let deleted = chat.delete_message(&identity, id).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}
