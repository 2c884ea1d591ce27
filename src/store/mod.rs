//! Store Module
//!
//! The key-value boundary the caches are built on, plus its in-memory
//! implementation.
//!
//! Any backing store that provides the seven core operations (`get`, `set`,
//! `incr`, `exists`, `rpush`, `lrange`, `flushdb`) can implement
//! [`KeyValueStore`]. `ttl` reports remaining lifetimes. `incr_expiring` has
//! no default: composing it from `exists` and `incr` lets a window lapse
//! between the two calls and leaves a counter with no expiry, so every store
//! must supply it as a single atomic step.

mod engine;
mod entry;
mod memory;
mod stats;
mod timeout;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use engine::StoreEngine;
pub use entry::{current_timestamp_ms, StoreEntry, StoredValue};
pub use memory::MemoryStore;
pub use stats::StoreStats;
pub use timeout::TimeoutStore;

// == Key Value Store ==
/// Asynchronous key-value store boundary.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value at `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` at `key`, replacing any prior value and expiry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Atomically increments the counter at `key`, starting from 1.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Returns true if `key` holds a live value.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Appends `value` to the list at `key` and returns the new length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns the inclusive slice `start..=end` of the list at `key`.
    async fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flushdb(&self) -> Result<()>;

    /// Returns the remaining lifetime of `key`, or None if absent or persistent.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>>;

    /// Increments a counter that restarts at 1 with a fresh `window` whenever
    /// it is absent or expired, and otherwise keeps its current expiry.
    ///
    /// Must be atomic: a counter created or reset here always carries `window`.
    async fn incr_expiring(&self, key: &str, window: Duration) -> Result<i64>;

    /// Returns the whole list at `key`.
    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        self.lrange(key, 0, -1).await
    }
}
