//! Database connection pool
//!
//! Opens (or creates) the SQLite store configured at startup. The storage
//! path is fixed for the lifetime of the process; re-opening an existing
//! file is idempotent.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Create a SQLite connection pool for the configured storage path.
///
/// The parent directory and the database file are created if they do not
/// exist. Foreign key enforcement is enabled on the pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    open(&config.path).await
}

/// Create an in-memory pool for testing.
pub async fn create_test_pool() -> Result<SqlitePool> {
    open(":memory:").await
}

async fn open(path: &str) -> Result<SqlitePool> {
    let in_memory = path == ":memory:" || path.starts_with("sqlite::memory:");

    if !in_memory {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }
    }

    let connection_url = if in_memory {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    };

    // An in-memory database exists per connection, so the pool must stay at
    // a single connection or each checkout would see an empty schema.
    let max_connections = if in_memory { 1 } else { 20 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&connection_url)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", path))?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}
