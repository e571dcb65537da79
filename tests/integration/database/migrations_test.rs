//! Migration tests
//!
//! The embedded migrations create every table the stores use.

use crate::common::TestDatabase;

#[tokio::test]
async fn test_migrations_create_tables() {
    let db = TestDatabase::new().await;

    let mut tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%'")
            .fetch_all(db.pool())
            .await
            .unwrap();
    tables.sort();

    assert_eq!(tables, vec!["group_members", "groups", "messages", "users"]);
}
