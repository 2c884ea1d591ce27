//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::replay::{Replay, ReplayEntry};
use crate::store::StoreStats;

/// Response body for the STORE operation (POST /store)
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the call counter endpoint (GET /calls/:operation)
#[derive(Debug, Clone, Serialize)]
pub struct CallsResponse {
    pub operation: String,
    pub count: u64,
}

impl CallsResponse {
    pub fn new(operation: impl Into<String>, count: u64) -> Self {
        Self {
            operation: operation.into(),
            count,
        }
    }
}

/// One recorded call in a [`ReplayResponse`]
#[derive(Debug, Clone, Serialize)]
pub struct ReplayCall {
    pub index: usize,
    pub input: String,
    pub output: String,
}

impl From<ReplayEntry> for ReplayCall {
    fn from(entry: ReplayEntry) -> Self {
        Self {
            index: entry.index,
            input: entry.input,
            output: entry.output,
        }
    }
}

/// Response body for the replay endpoint (GET /replay/:operation)
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    /// The replayed operation
    pub operation: String,
    /// Call counter value
    pub count: u64,
    /// Recorded calls in call order
    pub calls: Vec<ReplayCall>,
}

impl From<&Replay> for ReplayResponse {
    fn from(replay: &Replay) -> Self {
        Self {
            operation: replay.operation().to_string(),
            count: replay.count(),
            calls: replay.entries().map(ReplayCall::from).collect(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads that found a value
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Number of keys removed after their TTL elapsed
    pub expired: u64,
    /// Current number of keys in the store
    pub total_keys: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            total_keys: stats.total_keys,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
