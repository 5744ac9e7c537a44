// src/core/cache.rs
//! Best-effort key-value cache used to paint the job list before the network
//! answers. Never authoritative: a fresh fetch always replaces it, and any
//! failure reading it is a miss.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::types::JobListing;

pub const JOBS_CACHE_KEY: &str = "jobs_cache";

#[derive(Debug, Clone)]
pub struct CachedValue<T> {
    pub value: T,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    pool: SqlitePool,
}

impl CacheStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read and decode `key`. Missing rows, database errors and corrupt JSON all return `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CachedValue<T>> {
        let row: Option<(String, String)> =
            match sqlx::query_as("SELECT value, updated_at FROM cache_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
            {
                Ok(row) => row,
                Err(e) => {
                    warn!("Cache read for {} failed: {}", key, e);
                    return None;
                }
            };

        let (raw, updated_at) = row?;

        let value = match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding corrupt cache entry {}: {}", key, e);
                return None;
            }
        };

        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Some(CachedValue { value, updated_at })
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("Failed to encode cache entry")?;

        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write cache entry {}", key))?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove cache entry {}", key))?;
        Ok(result.rows_affected() > 0)
    }
}

/// The single cached list: the last public job feed fetched.
#[derive(Debug, Clone)]
pub struct JobCache {
    store: CacheStore,
}

impl JobCache {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Option<CachedValue<Vec<JobListing>>> {
        let cached = self.store.get::<Vec<JobListing>>(JOBS_CACHE_KEY).await;
        match &cached {
            Some(entry) => info!(
                "Loaded {} cached jobs from {}",
                entry.value.len(),
                entry.updated_at
            ),
            None => info!("No cached job list"),
        }
        cached
    }

    /// Store the list; failures are logged and swallowed.
    pub async fn store(&self, jobs: &[JobListing]) {
        if let Err(e) = self.store.set(JOBS_CACHE_KEY, jobs).await {
            warn!("Could not cache job list: {:#}", e);
        }
    }

    pub async fn clear(&self) -> Result<bool> {
        self.store.remove(JOBS_CACHE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::pipeline::fixtures::listing;

    async fn cache() -> (Database, JobCache) {
        let db = Database::in_memory().await.unwrap();
        let cache = JobCache::new(CacheStore::new(db.pool().clone()));
        (db, cache)
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let (_db, cache) = cache().await;
        assert!(cache.load().await.is_none());

        let jobs = vec![listing("1", "Engineer", "Initech"), listing("2", "Designer", "Acme")];
        cache.store(&jobs).await;

        let cached = cache.load().await.unwrap();
        assert_eq!(cached.value, jobs);
    }

    #[tokio::test]
    async fn test_fresh_list_replaces_cached_one() {
        let (_db, cache) = cache().await;
        cache.store(&[listing("1", "Engineer", "Initech")]).await;
        cache.store(&[listing("3", "Analyst", "Acme")]).await;

        let cached = cache.load().await.unwrap();
        assert_eq!(cached.value.len(), 1);
        assert_eq!(cached.value[0].id, "3");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (db, cache) = cache().await;
        sqlx::query("INSERT INTO cache_entries (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(JOBS_CACHE_KEY)
            .bind("{not json")
            .bind("2024-01-01T00:00:00Z")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (_db, cache) = cache().await;
        cache.store(&[listing("1", "Engineer", "Initech")]).await;
        assert!(cache.clear().await.unwrap());
        assert!(!cache.clear().await.unwrap());
        assert!(cache.load().await.is_none());
    }
}
