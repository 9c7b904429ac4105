//! services/api/src/adapters/store.rs
//!
//! The SQLite-backed implementation of the `KeyValueStore` port. Every record
//! the core persists is one row of the `kv_store` table.

use async_trait::async_trait;
use chrono::Utc;
use juris_resumo_core::ports::{KeyValueStore, PortError, PortResult};
use sqlx::SqlitePool;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `KeyValueStore` port.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Creates a new `SqliteKvStore`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteKvStore {
        // a single connection keeps the in-memory database alive and shared
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteKvStore::new(pool);
        store.run_migrations().await.unwrap();
        store
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = store().await;
        assert_eq!(store.get("history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_the_previous_value() {
        let store = store().await;
        store.set("users", "[]").await.unwrap();
        store.set("users", "[{\"id\":\"user-1\"}]").await.unwrap();
        assert_eq!(
            store.get("users").await.unwrap().as_deref(),
            Some("[{\"id\":\"user-1\"}]")
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = store().await;
        store.set("session:abc", "{}").await.unwrap();
        store.remove("session:abc").await.unwrap();
        store.remove("session:abc").await.unwrap();
        assert_eq!(store.get("session:abc").await.unwrap(), None);
    }
}
