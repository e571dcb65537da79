/**
 * Group Store
 *
 * SQLite persistence for groups and their member sets. A `Group` is always
 * returned with its members resolved to display names through the `users`
 * table, ordered by join time.
 */

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::backend::chat::db::{from_micros, now, to_micros};
use crate::shared::{Group, GroupMember};

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    creator_id: Uuid,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    username: String,
}

impl GroupRow {
    fn into_group(self, members: Vec<MemberRow>) -> Group {
        Group {
            id: self.id,
            name: self.name,
            description: self.description,
            creator: self.creator_id,
            members: members
                .into_iter()
                .map(|m| GroupMember {
                    id: m.id,
                    username: m.username,
                })
                .collect(),
            created_at: from_micros(self.created_at),
            updated_at: from_micros(self.updated_at),
        }
    }
}

async fn load_members(pool: &SqlitePool, group_id: Uuid) -> Result<Vec<MemberRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT u.id AS id, u.username AS username
        FROM group_members gm
        JOIN users u ON u.id = gm.user_id
        WHERE gm.group_id = ?
        ORDER BY gm.joined_at ASC, u.username ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

async fn insert_member(conn: &mut SqliteConnection, group_id: Uuid, user_id: Uuid, joined_at: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("INSERT OR IGNORE INTO group_members (group_id, user_id, joined_at) VALUES (?, ?, ?)")
        .bind(group_id)
        .bind(user_id)
        .bind(joined_at)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Create a group and its member set in one transaction
///
/// `member_ids` must already contain the creator and be free of duplicates.
pub async fn create_group(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    creator: Uuid,
    member_ids: &[Uuid],
) -> Result<Group, sqlx::Error> {
    let id = Uuid::new_v4();
    let created_at = to_micros(now());

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO groups (id, name, description, creator_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(creator)
    .bind(created_at)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    for &user_id in member_ids {
        insert_member(&mut tx, id, user_id, created_at).await?;
    }
    tx.commit().await?;

    get_group(pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Get a group with its members
pub async fn get_group(pool: &SqlitePool, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    let row = sqlx::query_as::<_, GroupRow>(
        "SELECT id, name, description, creator_id, created_at, updated_at FROM groups WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let members = load_members(pool, row.id).await?;
            Ok(Some(row.into_group(members)))
        }
        None => Ok(None),
    }
}

/// Groups that contain `user_id`, most recently updated first
pub async fn list_groups_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Group>, sqlx::Error> {
    let rows = sqlx::query_as::<_, GroupRow>(
        r#"
        SELECT g.id, g.name, g.description, g.creator_id, g.created_at, g.updated_at
        FROM groups g
        JOIN group_members gm ON gm.group_id = g.id
        WHERE gm.user_id = ?
        ORDER BY g.updated_at DESC, g.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut groups = Vec::with_capacity(rows.len());
    for row in rows {
        let members = load_members(pool, row.id).await?;
        groups.push(row.into_group(members));
    }
    Ok(groups)
}

pub async fn is_member(pool: &SqlitePool, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM group_members WHERE group_id = ? AND user_id = ?")
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Rewrite name and description and bump `updated_at`
///
/// # Returns
/// `true` if the group exists
pub async fn update_group(
    pool: &SqlitePool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE groups SET name = ?, description = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(description)
        .bind(to_micros(now()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Add members, skipping those already present
///
/// # Returns
/// The ids that were actually added, in input order
pub async fn add_members(pool: &SqlitePool, group_id: Uuid, user_ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
    let joined_at = to_micros(now());
    let mut tx = pool.begin().await?;

    let mut added = Vec::new();
    for &user_id in user_ids {
        if insert_member(&mut tx, group_id, user_id, joined_at).await? {
            added.push(user_id);
        }
    }
    if !added.is_empty() {
        touch_group(&mut tx, group_id, joined_at).await?;
    }
    tx.commit().await?;

    Ok(added)
}

/// Remove one member
///
/// # Returns
/// `true` if the user was a member
pub async fn remove_member(pool: &SqlitePool, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let removed = result.rows_affected() > 0;
    if removed {
        touch_group(&mut tx, group_id, to_micros(now())).await?;
    }
    tx.commit().await?;
    Ok(removed)
}

/// Delete a group and its member set; its messages are left in place
///
/// # Returns
/// `true` if the group existed
pub async fn delete_group(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM group_members WHERE group_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM groups WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

async fn touch_group(conn: &mut SqliteConnection, group_id: Uuid, at: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE groups SET updated_at = ? WHERE id = ?")
        .bind(at)
        .bind(group_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
