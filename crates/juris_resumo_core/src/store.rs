//! crates/juris_resumo_core/src/store.rs
//!
//! JSON marshalling on top of a `KeyValueStore`, plus an in-process store.

use crate::ports::{KeyValueStore, PortError, PortResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

pub const USERS_KEY: &str = "users";
pub const HISTORY_KEY: &str = "history";
pub const LAST_SUMMARIES_KEY: &str = "lastSummaries";
pub const LAST_RAW_TEXT_KEY: &str = "lastRawText";

pub fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Typed access to a key-value store. Every record read is an owned copy.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<dyn KeyValueStore>,
}

impl JsonStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Reads and decodes `key`, surfacing storage failures. Corrupt JSON still reads
    /// as `None`. Use this before writing a value derived from what was read.
    pub async fn try_load<T: DeserializeOwned>(&self, key: &str) -> PortResult<Option<T>> {
        let Some(raw) = self.inner.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding unparseable value under '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Reads and decodes `key`. Missing keys, storage failures and corrupt JSON all
    /// read as `None`; the latter two are logged.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_load(key).await.unwrap_or_else(|e| {
            warn!("Failed to read '{}' from store: {}", key, e);
            None
        })
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| PortError::Unexpected(format!("serialize '{key}': {e}")))?;
        self.inner.set(key, &raw).await
    }

    /// Raw string access, for values stored without JSON encoding.
    pub async fn load_raw(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read '{}' from store: {}", key, e);
                None
            }
        }
    }

    pub async fn save_raw(&self, key: &str, value: &str) -> PortResult<()> {
        self.inner.set(key, value).await
    }

    pub async fn remove(&self, key: &str) -> PortResult<()> {
        self.inner.remove(key).await
    }
}

//=========================================================================================
// In-process store
//=========================================================================================

/// A `KeyValueStore` backed by a `HashMap`. Contents live as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Unexpected("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// A `MemoryStore` that can be told to fail its next `get`, or every `remove`.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    fail_next_get: AtomicBool,
    fail_remove: AtomicBool,
}

#[cfg(test)]
impl FlakyStore {
    pub(crate) fn fail_next_get(&self) {
        self.fail_next_get.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_removes(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        if self.fail_next_get.swap(false, Ordering::SeqCst) {
            return Err(PortError::Unexpected("database is locked".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("disk I/O error".to_string()));
        }
        self.inner.remove(key).await
    }
}
