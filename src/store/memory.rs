//! In-memory store handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::{KeyValueStore, StoreEngine, StoreStats};

// == Memory Store ==
/// Cloneable handle to a shared [`StoreEngine`].
///
/// Every trait call takes the engine lock exactly once, so each operation
/// (including `incr` and `incr_expiring`) is atomic with respect to other
/// callers. Reads take the write lock too because they may purge an expired
/// key and always update statistics.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    engine: Arc<RwLock<StoreEngine>>,
}

impl MemoryStore {
    /// Creates a handle to a new, empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        self.engine.read().await.stats()
    }

    /// Removes all expired keys and returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.engine.write().await.cleanup_expired()
    }

    /// Returns the number of keys held.
    pub async fn len(&self) -> usize {
        self.engine.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.engine.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.engine.write().await.get(key)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.engine.write().await.set(key.to_string(), value, ttl)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.engine.write().await.incr(key)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.engine.write().await.exists(key))
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.engine.write().await.rpush(key, value)
    }

    async fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>> {
        self.engine.write().await.lrange(key, start, end)
    }

    async fn flushdb(&self) -> Result<()> {
        self.engine.write().await.flush();
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        Ok(self.engine.write().await.ttl(key))
    }

    async fn incr_expiring(&self, key: &str, window: Duration) -> Result<i64> {
        self.engine.write().await.incr_expiring(key, window)
    }
}
