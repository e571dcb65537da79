//! Group Data Structures
//!
//! Request/response shapes for the group membership endpoints and the
//! `Group` view returned by them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Maximum group name length, in characters
pub const MAX_GROUP_NAME_CHARS: usize = 100;

/// Maximum group description length, in characters
pub const MAX_GROUP_DESCRIPTION_CHARS: usize = 500;

/// A group member with its display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: Uuid,
    pub username: String,
}

/// A group and its members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub creator: Uuid,
    pub members: Vec<GroupMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|member| member.id).collect()
    }
}

/// Body of `POST /api/groups`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Body of `PUT /api/groups/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /api/groups/{id}/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembersRequest {
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

/// Trim and validate a group name
pub fn validate_group_name(name: &str) -> Result<String, SharedError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("name", "Group name is required"));
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_CHARS {
        return Err(SharedError::validation(
            "name",
            format!("Group name exceeds {} characters", MAX_GROUP_NAME_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate a group description. Blank descriptions become `None`.
pub fn validate_group_description(description: &str) -> Result<Option<String>, SharedError> {
    let trimmed = description.trim();
    if trimmed.chars().count() > MAX_GROUP_DESCRIPTION_CHARS {
        return Err(SharedError::validation(
            "description",
            format!("Description exceeds {} characters", MAX_GROUP_DESCRIPTION_CHARS),
        ));
    }
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
