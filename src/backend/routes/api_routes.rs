/**
 * Group API Route Configuration
 *
 * # Routes
 *
 * - `POST /api/groups` - Create a group
 * - `GET /api/groups` - List the caller's groups
 * - `GET /api/groups/{id}` - Group details
 * - `PUT /api/groups/{id}` - Rename / describe (creator only)
 * - `DELETE /api/groups/{id}` - Delete (creator only)
 * - `POST /api/groups/{id}/members` - Add members
 * - `DELETE /api/groups/{id}/members/{user_id}` - Remove a member
 *
 * Authentication is applied by the caller (`router.rs`).
 */

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::backend::groups::handlers::{
    add_members, create_group, delete_group, get_group, list_groups, remove_member, update_group,
};
use crate::backend::server::state::AppState;

/// Configure group API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/groups", post(create_group).get(list_groups))
        .route("/api/groups/{id}", get(get_group).put(update_group).delete(delete_group))
        .route("/api/groups/{id}/members", post(add_members))
        .route("/api/groups/{id}/members/{user_id}", delete(remove_member))
}
