// src/core/database.rs
//! Local SQLite store backing the best-effort caches.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::core::FsOps;

const CACHE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cache_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the cache file, creating it and its directory on first use.
    pub async fn new(cache_path: &Path) -> Result<Self> {
        if let Some(dir) = cache_path.parent() {
            FsOps::ensure_dir_exists(dir).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(cache_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open cache at {}", cache_path.display()))?;

        info!("Opened cache {}", cache_path.display());
        Self::prepared(pool).await
    }

    /// Private in-memory database; a single connection so every query sees the same data.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        Self::prepared(pool).await
    }

    async fn prepared(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CACHE_SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create cache_entries table")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of cached keys.
    pub async fn entry_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count cache entries")?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.db");
        let db = Database::new(&path).await.unwrap();
        assert_eq!(db.entry_count().await.unwrap(), 0);
        assert!(path.exists());
    }
}
