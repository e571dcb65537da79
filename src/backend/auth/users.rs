/**
 * User Model and Database Operations
 *
 * Users are registered by the identity service; the chat core only needs
 * their id and display name. `create_user` exists for seeding and tests.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::chat::db::{from_micros, now, to_micros};

/// User struct representing a user in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub username: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: from_micros(row.created_at),
        }
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username` - User's display name (unique)
///
/// # Returns
/// Created user or error
pub async fn create_user(pool: &SqlitePool, username: &str) -> Result<User, sqlx::Error> {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        created_at: now(),
    };

    sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
        .bind(user.id)
        .bind(&user.username)
        .bind(to_micros(user.created_at))
        .execute(pool)
        .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(pool: &SqlitePool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>("SELECT id, username, created_at FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(User::from))
}

/// Return the subset of `user_ids` that does not exist
pub async fn find_missing_users(pool: &SqlitePool, user_ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut missing = Vec::new();
    for &user_id in user_ids {
        if get_user_by_id(pool, user_id).await?.is_none() {
            missing.push(user_id);
        }
    }
    Ok(missing)
}
