//! Database module for handling SQLite connections and schema bootstrap
//!
//! This module provides connection pooling, configuration, idempotent schema
//! creation and health checks for the single-file SQLite database.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{env, str::FromStr, time::Duration};
use tracing::{error, info};

/// Schema statements, applied in order on every startup
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_create_users",
        include_str!("../migrations/0001_create_users.sql"),
    ),
    (
        "0002_create_messages",
        include_str!("../migrations/0002_create_messages.sql"),
    ),
    (
        "0003_index_messages_by_user",
        include_str!("../migrations/0003_index_messages_by_user.sql"),
    ),
];

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: "sqlite://health_assistant.db")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Acquire timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://health_assistant.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        if max_connections == 0 {
            return Err(DatabaseError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            connection_timeout,
        })
    }
}

/// Initialize a SQLite connection pool
///
/// The database file is created if it does not exist and foreign keys are
/// enforced on every connection.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<SqlitePool>` - SQLite connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    info!("Initializing database connection pool");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Create the `users` and `messages` tables if they are absent
///
/// Every statement is written with `IF NOT EXISTS`, so running this against
/// an already initialised database is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DatabaseResult<()> {
    for (name, statement) in MIGRATIONS {
        sqlx::query(*statement).execute(pool).await.map_err(|e| {
            error!("Migration {} failed: {}", name, e);
            DatabaseError::Migration(format!("{}: {}", name, e))
        })?;
    }

    info!("Database schema is up to date");
    Ok(())
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - SQLite connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if connection is successful
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}
