//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::instrumented::InstrumentedCache;
use crate::models::{
    CallsResponse, GetResponse, HealthResponse, ReplayResponse, StatsResponse, StoreRequest,
    StoreResponse,
};
use crate::store::{MemoryStore, TimeoutStore};

/// Store stack served by the HTTP API.
pub type ServedStore = TimeoutStore<MemoryStore>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Instrumented cache over the shared store
    pub cache: Arc<InstrumentedCache<ServedStore>>,
    /// Handle to the in-memory store, used for stats and the cleanup task
    pub memory: MemoryStore,
}

impl AppState {
    /// Creates a new AppState over `memory`, bounding store calls by `timeout`.
    ///
    /// The store is flushed as part of creating the cache.
    pub async fn new(memory: MemoryStore, timeout: Duration) -> Result<Self> {
        let store = Arc::new(TimeoutStore::new(memory.clone(), timeout));
        let cache = InstrumentedCache::new(store).await?;

        Ok(Self {
            cache: Arc::new(cache),
            memory,
        })
    }

    /// Creates a new AppState from configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::new(MemoryStore::new(), config.store_timeout()).await
    }
}

/// Handler for POST /store
///
/// Stores the payload under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.data).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value as UTF-8 text.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get_str(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /calls/:operation
pub async fn calls_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<CallsResponse>> {
    let count = state.cache.call_count(&operation).await?;
    Ok(Json(CallsResponse::new(operation, count)))
}

/// Handler for GET /replay/:operation
///
/// Returns the operation's recorded calls in call order.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let replay = state.cache.replay(&operation).await?;
    Ok(Json(ReplayResponse::from(&replay)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.memory.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
