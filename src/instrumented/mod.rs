//! Instrumented Cache Module
//!
//! A cache that stores opaque values under generated keys and records how
//! often, and with what inputs and outputs, its `store` operation was called.

mod advice;
mod value;


use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CacheError, Result};
use crate::replay::Replay;
use crate::store::KeyValueStore;

// Re-export public types
pub use advice::{
    call_count, inputs_key, outputs_key, serialize_args, Advice, TrackedOperation, DEFAULT_ADVICE,
};
pub use value::IntoValue;

// == Public Constants ==
/// Stable identifier of [`InstrumentedCache::store`].
pub const STORE_OPERATION: &str = "Cache.store";

// == Instrumented Cache ==
/// Cache over an injected store handle with call counting and history.
pub struct InstrumentedCache<S: ?Sized> {
    store: Arc<S>,
    store_op: TrackedOperation,
}

impl<S: KeyValueStore + ?Sized> InstrumentedCache<S> {
    // == Constructor ==
    /// Creates a cache over `store` with the default advice.
    ///
    /// The store is flushed, so every new cache starts with zeroed counters
    /// and empty histories.
    pub async fn new(store: Arc<S>) -> Result<Self> {
        Self::with_advice(store, DEFAULT_ADVICE.to_vec()).await
    }

    /// Creates a cache whose `store` operation is wrapped in `advice`, in order.
    ///
    /// Invalid advice lists are rejected before the store is touched.
    pub async fn with_advice(store: Arc<S>, advice: Vec<Advice>) -> Result<Self> {
        let store_op = TrackedOperation::with_advice(STORE_OPERATION, advice)?;
        store.flushdb().await?;
        info!("Instrumented cache initialized with advice {:?}", store_op.advice());

        Ok(Self { store, store_op })
    }

    // == Store ==
    /// Stores `data` under a freshly generated key and returns the key.
    pub async fn store(&self, data: impl IntoValue) -> Result<String> {
        let data = data.into_value();
        let backing = &self.store;
        let value = data.clone();

        let key = self
            .store_op
            .invoke(&**backing, &[data.as_slice()], move || async move {
                let key = Uuid::new_v4().to_string();
                backing.set(&key, value, None).await?;
                Ok::<_, CacheError>(key)
            })
            .await?;

        debug!("Stored {} bytes under {}", data.len(), key);
        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes stored at `key`, or None if absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Returns the value at `key` converted by `decode`.
    ///
    /// `decode` only sees present values; an absent key yields `Ok(None)`.
    /// Errors returned by `decode` are propagated unchanged.
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        match self.store.get(key).await? {
            Some(raw) => decode(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the value at `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| String::from_utf8(raw).map_err(CacheError::decode))
            .await
    }

    /// Returns the value at `key` parsed as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(&raw)
                .map_err(CacheError::decode)?
                .trim()
                .parse::<i64>()
                .map_err(CacheError::decode)
        })
        .await
    }

    // == Introspection ==
    /// Number of times `operation` has been called since the cache was created.
    pub async fn call_count(&self, operation: &str) -> Result<u64> {
        call_count(&*self.store, operation).await
    }

    /// Reads the recorded call history of `operation`.
    pub async fn replay(&self, operation: &str) -> Result<Replay> {
        Replay::load(&*self.store, operation).await
    }

    /// Identifier under which `store` calls are tracked.
    pub fn store_operation(&self) -> &str {
        self.store_op.id()
    }

    /// The injected store handle.
    pub fn backing_store(&self) -> &Arc<S> {
        &self.store
    }
}
