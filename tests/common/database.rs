//! Database test fixtures
//!
//! Every fixture is a private in-memory SQLite database with the schema
//! applied, so tests never share state.

use sqlx::SqlitePool;
use utasks_chat::backend::server::config::memory_pool;

pub struct TestDatabase {
    pool: SqlitePool,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let pool = memory_pool().await.expect("Failed to create in-memory database");
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
