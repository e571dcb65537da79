/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and the
 * SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (after `.env` is read by
 * the binary), with defaults for local development where one makes sense.
 * The signing secret has no default.
 *
 * | Variable       | Default                              |
 * |----------------|--------------------------------------|
 * | `DATABASE_URL` | `sqlite://utasks-chat.db?mode=rwc`   |
 * | `JWT_SECRET`   | required                             |
 * | `SERVER_PORT`  | `3000`                               |
 * | `FRONTEND_URL` | `http://localhost:5173`              |
 */

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://utasks-chat.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingValue(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    /// Origin allowed by CORS
    pub frontend_url: String,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingValue("JWT_SECRET"))?;

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let frontend_url = lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            frontend_url,
        })
    }

    /// Configuration suitable for tests: in-memory database, fixed secret
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: jwt_secret.to_string(),
            port: 0,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

/// Connect the SQLite pool and run embedded migrations
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("[Database] Connecting to {}", database_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory pool with the schema applied
///
/// An in-memory SQLite database lives as long as its connection, so the pool
/// keeps exactly one connection open forever.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("[Database] Running migrations...");
    sqlx::migrate!().run(pool).await?;
    tracing::info!("[Database] Migrations completed");
    Ok(())
}
