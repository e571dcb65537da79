/**
 * Chat Route Configuration
 *
 * # Routes
 *
 * - `GET /api/chat/history/{room}` - Room history
 * - `GET /api/chat/private/{user_id}` - Private conversation history
 * - `GET /api/chat/group/{group_id}` - Group conversation history
 * - `GET /api/chat/conversations` - Latest message per private conversation
 * - `GET /api/chat/users/online` - Online users
 * - `PUT /api/chat/messages/{id}` - Edit a message
 * - `DELETE /api/chat/messages/{id}` - Delete a message
 *
 * Authentication is applied by the caller (`router.rs`).
 */

use axum::{
    routing::{get, put},
    Router,
};

use crate::backend::chat::handlers::{
    delete_message, edit_message, get_conversations, get_group_history, get_online_users, get_private_history,
    get_room_history,
};
use crate::backend::server::state::AppState;

/// Configure chat-related routes
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/chat/history/{room}", get(get_room_history))
        .route("/api/chat/private/{user_id}", get(get_private_history))
        .route("/api/chat/group/{group_id}", get(get_group_history))
        .route("/api/chat/conversations", get(get_conversations))
        .route("/api/chat/users/online", get(get_online_users))
        .route("/api/chat/messages/{id}", put(edit_message).delete(delete_message))
}
