//! Tracked Cache - An in-memory key-value cache with call tracking
//!
//! Provides a Redis-like store with TTL expiration, a cache that counts and
//! records the calls made to it, a fetch wrapper that counts accesses per URL
//! within a time window, and replay of recorded call history.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod instrumented;
pub mod models;
pub mod replay;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{ExpiringFetchCache, Fetcher, HttpFetcher};
pub use instrumented::{InstrumentedCache, IntoValue};
pub use replay::{Replay, ReplayEntry};
pub use store::{KeyValueStore, MemoryStore, TimeoutStore};
pub use tasks::spawn_cleanup_task;
