//! `SQLite`-backed key-value store
//!
//! One row per key in `kv_entries`. Writes are upserts, so concurrent writers
//! resolve to whichever landed last. Expired rows are invisible to reads and
//! removed by [`SqliteStore::purge_expired`].

use crate::error::StorageError;
use async_trait::async_trait;
use needledrop_core::{KeyValueStore, Result};
use sqlx::{Row, SqlitePool};
use std::time::Duration;

/// Key-value store persisted in `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap a pool whose migrations have already been run
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Delete every expired row, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn purge_expired(&self) -> std::result::Result<u64, StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        let result = sqlx::query("DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn read(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        let row = sqlx::query(
            "SELECT value FROM kv_entries WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> std::result::Result<(), StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        let expires_at = ttl
            .map(|ttl| {
                i64::try_from(ttl.as_millis())
                    .ok()
                    .and_then(|ms| now.checked_add(ms))
                    .ok_or_else(|| StorageError::InvalidExpiry(format!("{ttl:?}")))
            })
            .transpose()?;

        sqlx::query(
            "INSERT INTO kv_entries (key, value, expires_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get_text(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        Ok(self.write(key, value, ttl).await?)
    }
}
