//! Store Statistics Module
//!
//! Tracks read hits, misses and expired-key removals of the store engine.

use serde::Serialize;

// == Store Stats ==
/// Tracks store read metrics.
///
/// Every `get` is counted, whoever issues it. Call-counter reads made by
/// `call_count` and `Replay::load` therefore show up as hits or misses too.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of `get` calls that found a live value
    pub hits: u64,
    /// Number of `get` calls that found nothing (absent or expired)
    pub misses: u64,
    /// Number of keys physically removed because their TTL elapsed
    pub expired: u64,
    /// Current number of keys in the store
    pub total_keys: usize,
}

impl StoreStats {
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Adds `count` physically removed expired keys.
    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }

    pub fn set_total_keys(&mut self, count: usize) {
        self.total_keys = count;
    }
}
