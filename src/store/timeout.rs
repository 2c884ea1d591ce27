//! Deadline decorator for backing stores.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Timeout Store ==
/// Wraps a store so that every call fails with [`CacheError::Timeout`] once
/// `timeout` elapses.
///
/// A timed-out call may still have been applied by the inner store; callers
/// treat the error as transient and decide themselves whether to retry.
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: KeyValueStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(&self, op: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Store call '{}' timed out after {:?}", op, self.timeout);
                Err(CacheError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for TimeoutStore<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.bounded("incr", self.inner.incr(key)).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.bounded("rpush", self.inner.rpush(key, value)).await
    }

    async fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>> {
        self.bounded("lrange", self.inner.lrange(key, start, end)).await
    }

    async fn flushdb(&self) -> Result<()> {
        self.bounded("flushdb", self.inner.flushdb()).await
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        self.bounded("ttl", self.inner.ttl(key)).await
    }

    async fn incr_expiring(&self, key: &str, window: Duration) -> Result<i64> {
        self.bounded("incr_expiring", self.inner.incr_expiring(key, window))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    /// Store whose `get` and `incr_expiring` never complete in time.
    struct SlowStore;

    #[async_trait]
    impl KeyValueStore for SlowStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
            Ok(())
        }

        async fn incr(&self, _key: &str) -> Result<i64> {
            Ok(1)
        }

        async fn exists(&self, _key: &str) -> Result<bool> {
            Ok(false)
        }

        async fn rpush(&self, _key: &str, _value: Vec<u8>) -> Result<usize> {
            Ok(1)
        }

        async fn lrange(&self, _key: &str, _start: i64, _end: i64) -> Result<Vec<Vec<u8>>> {
            Ok(Vec::new())
        }

        async fn flushdb(&self) -> Result<()> {
            Ok(())
        }

        async fn ttl(&self, _key: &str) -> Result<Option<Duration>> {
            Ok(None)
        }

        async fn incr_expiring(&self, _key: &str, _window: Duration) -> Result<i64> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let store = TimeoutStore::new(SlowStore, Duration::from_millis(50));

        let result = store.get("key").await;

        assert!(matches!(result, Err(CacheError::Timeout(_))));
        assert!(result.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_fast_calls_pass_through() {
        let store = TimeoutStore::new(MemoryStore::new(), Duration::from_secs(1));

        store.set("key", b"v".to_vec(), None).await.unwrap();
        assert_eq!(store.incr("n").await.unwrap(), 1);
        assert_eq!(store.get("key").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.inner().len().await, 2);
    }

    #[tokio::test]
    async fn test_slow_incr_expiring_times_out() {
        let store = TimeoutStore::new(SlowStore, Duration::from_millis(50));

        let result = store.incr_expiring("hits", Duration::from_secs(1)).await;

        assert!(matches!(result, Err(CacheError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_incr_expiring_passes_window_through() {
        let store = TimeoutStore::new(MemoryStore::new(), Duration::from_secs(1));

        assert_eq!(store.incr_expiring("hits", Duration::from_secs(10)).await.unwrap(), 1);
        assert_eq!(store.incr_expiring("hits", Duration::from_secs(10)).await.unwrap(), 2);

        let remaining = store.ttl("hits").await.unwrap().unwrap();
        assert!(remaining <= Duration::from_secs(10));
    }
}
