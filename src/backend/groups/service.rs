/**
 * Group Membership Service
 *
 * Authorization rules for group CRUD and the realtime notifications that
 * follow each mutation. The store is written first; notifications go out
 * only after the write succeeded, to whichever affected users are online.
 *
 * # Rules
 *
 * - The creator is always a member and can never be removed
 * - Only the creator renames, describes or deletes a group
 * - Any member can add members
 * - The creator can remove anyone else; a member can remove only themself
 */

use std::collections::HashSet;
use uuid::Uuid;
use sqlx::SqlitePool;

use crate::backend::auth::users::find_missing_users;
use crate::backend::auth::Identity;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::groups::db;
use crate::backend::realtime::PresenceRegistry;
use crate::shared::group::{validate_group_description, validate_group_name};
use crate::shared::{
    CreateGroupRequest, Group, GroupDeletion, GroupMembershipChange, RoomKey, ServerEvent, SharedError,
    UpdateGroupRequest,
};

#[derive(Clone)]
pub struct GroupService {
    pool: SqlitePool,
    presence: PresenceRegistry,
}

/// Deduplicate while keeping first-seen order
fn unique(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl GroupService {
    pub fn new(pool: SqlitePool, presence: PresenceRegistry) -> Self {
        Self { pool, presence }
    }

    async fn require_group(&self, id: Uuid) -> BackendResult<Group> {
        db::get_group(&self.pool, id)
            .await?
            .ok_or_else(|| BackendError::not_found("Group not found"))
    }

    async fn require_users(&self, user_ids: &[Uuid]) -> BackendResult<()> {
        let missing = find_missing_users(&self.pool, user_ids).await?;
        match missing.first() {
            Some(user_id) => Err(BackendError::not_found(format!("User {} not found", user_id))),
            None => Ok(()),
        }
    }

    /// Create a group owned by `actor`
    ///
    /// Members are the actor plus the supplied ids, deduplicated. Every
    /// member other than the creator is told with `group:member:added`.
    pub async fn create(&self, actor: &Identity, request: CreateGroupRequest) -> BackendResult<Group> {
        let name = validate_group_name(&request.name)?;
        let description = match request.description.as_deref() {
            Some(raw) => validate_group_description(raw)?,
            None => None,
        };

        let members = unique(std::iter::once(actor.user_id).chain(request.member_ids));
        self.require_users(&members[1..]).await?;

        let group = db::create_group(&self.pool, &name, description.as_deref(), actor.user_id, &members).await?;
        tracing::info!(
            "[Groups] {} created group {} with {} members",
            actor.username,
            group.id,
            group.members.len()
        );

        for &member in members.iter().filter(|id| **id != actor.user_id) {
            let event = ServerEvent::GroupMemberAdded(GroupMembershipChange {
                group_id: group.id,
                user_id: member,
                group: Some(group.clone()),
            });
            self.presence.send_to_user(member, event).await;
        }

        Ok(group)
    }

    /// Groups the actor belongs to, most recently updated first
    pub async fn list_for_user(&self, actor: &Identity) -> BackendResult<Vec<Group>> {
        Ok(db::list_groups_for_user(&self.pool, actor.user_id).await?)
    }

    pub async fn get(&self, actor: &Identity, id: Uuid) -> BackendResult<Group> {
        let group = self.require_group(id).await?;
        if !group.is_member(actor.user_id) {
            return Err(BackendError::NotAMember);
        }
        Ok(group)
    }

    /// Rename or describe a group. Creator only.
    pub async fn update(&self, actor: &Identity, id: Uuid, request: UpdateGroupRequest) -> BackendResult<Group> {
        let group = self.require_group(id).await?;
        if group.creator != actor.user_id {
            return Err(BackendError::forbidden("Only the creator can update the group"));
        }

        let name = match request.name.as_deref() {
            Some(raw) => validate_group_name(raw)?,
            None => group.name.clone(),
        };
        let description = match request.description.as_deref() {
            Some(raw) => validate_group_description(raw)?,
            None => group.description.clone(),
        };

        db::update_group(&self.pool, id, &name, description.as_deref()).await?;
        tracing::info!("[Groups] {} updated group {}", actor.username, id);
        self.require_group(id).await
    }

    /// Add members. Any current member may do this.
    ///
    /// Users already in the group are skipped. For each newly added user,
    /// every member (the new ones included) receives `group:member:added`.
    pub async fn add_members(&self, actor: &Identity, id: Uuid, user_ids: Vec<Uuid>) -> BackendResult<Group> {
        if user_ids.is_empty() {
            return Err(SharedError::validation("userIds", "User list required").into());
        }

        let group = self.require_group(id).await?;
        if !group.is_member(actor.user_id) {
            return Err(BackendError::forbidden("You must be a member to add users"));
        }

        let candidates = unique(user_ids);
        self.require_users(&candidates).await?;

        let added = db::add_members(&self.pool, id, &candidates).await?;
        let group = self.require_group(id).await?;
        if added.is_empty() {
            return Ok(group);
        }
        tracing::info!("[Groups] {} added {} members to group {}", actor.username, added.len(), id);

        let audience = group.member_ids();
        for user_id in added {
            let event = ServerEvent::GroupMemberAdded(GroupMembershipChange {
                group_id: id,
                user_id,
                group: Some(group.clone()),
            });
            self.presence.send_to_users(&audience, event).await;
        }

        Ok(group)
    }

    /// Remove one member
    ///
    /// The removed user and the remaining members receive
    /// `group:member:removed`; the removed user's connections stop receiving
    /// the group room.
    pub async fn remove_member(&self, actor: &Identity, id: Uuid, user_id: Uuid) -> BackendResult<Group> {
        let group = self.require_group(id).await?;

        if group.creator != actor.user_id && user_id != actor.user_id {
            return Err(BackendError::forbidden("Not authorized"));
        }
        if user_id == group.creator {
            return Err(SharedError::validation("userId", "The creator cannot leave the group").into());
        }
        if !group.is_member(user_id) {
            return Err(BackendError::not_found("User is not a member of this group"));
        }

        db::remove_member(&self.pool, id, user_id).await?;
        let group = self.require_group(id).await?;
        tracing::info!("[Groups] {} removed {} from group {}", actor.username, user_id, id);

        let mut audience = group.member_ids();
        audience.push(user_id);
        let event = ServerEvent::GroupMemberRemoved(GroupMembershipChange {
            group_id: id,
            user_id,
            group: Some(group.clone()),
        });
        self.presence.send_to_users(&audience, event).await;
        self.presence.evict_user_from_room(user_id, &RoomKey::group(id)).await;

        Ok(group)
    }

    /// Delete a group. Creator only.
    ///
    /// Messages stay in the store. Every former member receives
    /// `group:deleted` and the group room is closed.
    pub async fn delete(&self, actor: &Identity, id: Uuid) -> BackendResult<()> {
        let group = self.require_group(id).await?;
        if group.creator != actor.user_id {
            return Err(BackendError::forbidden("Only the creator can delete the group"));
        }

        db::delete_group(&self.pool, id).await?;
        tracing::info!("[Groups] {} deleted group {}", actor.username, id);

        for user_id in group.member_ids() {
            let event = ServerEvent::GroupDeleted(GroupDeletion { group_id: id, user_id });
            self.presence.send_to_user(user_id, event).await;
        }
        self.presence.close_room(&RoomKey::group(id)).await;

        Ok(())
    }
}
