//! Group HTTP Handlers
//!
//! Thin Axum wrappers around `GroupService`. All routes require
//! authentication.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::backend::groups::service::GroupService;
use crate::backend::middleware::AuthUser;
use crate::shared::{AddMembersRequest, ApiResponse, CreateGroupRequest, Group, UpdateGroupRequest};

/// `POST /api/groups`
pub async fn create_group(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Json(request): Json<CreateGroupRequest>,
) -> BackendResult<(StatusCode, Json<ApiResponse<Group>>)> {
    let group = groups.create(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group))))
}

/// `GET /api/groups`
pub async fn list_groups(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<ApiResponse<Vec<Group>>>> {
    let list = groups.list_for_user(&identity).await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// `GET /api/groups/{id}`
pub async fn get_group(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<ApiResponse<Group>>> {
    let group = groups.get(&identity, id).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// `PUT /api/groups/{id}`
pub async fn update_group(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGroupRequest>,
) -> BackendResult<Json<ApiResponse<Group>>> {
    let group = groups.update(&identity, id, request).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// `DELETE /api/groups/{id}`
pub async fn delete_group(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> BackendResult<Json<ApiResponse<Uuid>>> {
    groups.delete(&identity, id).await?;
    Ok(Json(ApiResponse::ok(id)))
}

/// `POST /api/groups/{id}/members`
pub async fn add_members(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMembersRequest>,
) -> BackendResult<Json<ApiResponse<Group>>> {
    let group = groups.add_members(&identity, id, request.user_ids).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// `DELETE /api/groups/{id}/members/{user_id}`
pub async fn remove_member(
    State(groups): State<GroupService>,
    AuthUser(identity): AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> BackendResult<Json<ApiResponse<Group>>> {
    let group = groups.remove_member(&identity, id, user_id).await?;
    Ok(Json(ApiResponse::ok(group)))
}
