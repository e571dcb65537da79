//! Authentication test helpers
//!
//! Creates users directly in the store and mints tokens for them with the
//! test signing secret.

use sqlx::SqlitePool;
use uuid::Uuid;
use utasks_chat::backend::auth::sessions::create_token;
use utasks_chat::backend::auth::users::create_user;
use utasks_chat::backend::auth::Identity;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Create a test user in the database
pub async fn create_test_user(pool: &SqlitePool, username: &str) -> TestUser {
    let user = create_user(pool, username).await.expect("Failed to create test user");
    let token = create_token(TEST_SECRET, user.id, &user.username).expect("Failed to create test token");

    TestUser {
        id: user.id,
        username: user.username,
        token,
    }
}
