//! Store Engine Module
//!
//! Synchronous key-value engine: HashMap storage with lazy TTL expiration,
//! integer counters and append-only lists.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{CacheError, Result};
use crate::store::{StoreEntry, StoreStats, StoredValue};

// == Store Engine ==
/// Single-owner storage engine.
///
/// Expired keys are treated as absent by every operation and removed the
/// first time an operation touches them, or by [`StoreEngine::cleanup_expired`].
#[derive(Debug, Default)]
pub struct StoreEngine {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
    /// Read statistics
    stats: StoreStats,
}

impl StoreEngine {
    // == Constructor ==
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the value stored at `key`, or None if absent or expired.
    ///
    /// Counters read back as their decimal representation. Lists cannot be
    /// read with `get`.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.purge_if_expired(key);

        let value = match self.entries.get(key) {
            None => None,
            Some(entry) => match &entry.value {
                StoredValue::Bytes(bytes) => Some(bytes.clone()),
                StoredValue::Integer(n) => Some(n.to_string().into_bytes()),
                StoredValue::List(_) => return Err(wrong_kind(key, &entry.value, "get")),
            },
        };

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        Ok(value)
    }

    // == Set ==
    /// Stores `value` at `key`, replacing any prior value and expiry.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The bytes to store
    /// * `ttl` - Optional lifetime measured from now; must be non-zero
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        validate_ttl(ttl)?;
        self.entries
            .insert(key, StoreEntry::new(StoredValue::Bytes(value), ttl));
        self.stats.set_total_keys(self.entries.len());
        Ok(())
    }

    // == Incr ==
    /// Increments the counter at `key`, initializing it to 1 if absent.
    ///
    /// An existing expiry is preserved. Byte values holding a decimal integer
    /// are converted to counters.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        self.purge_if_expired(key);

        match self.entries.get_mut(key) {
            Some(entry) => increment_entry(key, entry),
            None => {
                self.entries.insert(
                    key.to_string(),
                    StoreEntry::new(StoredValue::Integer(1), None),
                );
                self.stats.set_total_keys(self.entries.len());
                Ok(1)
            }
        }
    }

    // == Incr Expiring ==
    /// Increments a windowed counter.
    ///
    /// If `key` is absent or expired the counter restarts at 1 and expires
    /// `window` from now. Otherwise it is incremented and keeps its current
    /// expiry; the window is never renewed by a hit.
    pub fn incr_expiring(&mut self, key: &str, window: Duration) -> Result<i64> {
        validate_ttl(Some(window))?;
        self.purge_if_expired(key);

        match self.entries.get_mut(key) {
            Some(entry) => increment_entry(key, entry),
            None => {
                self.entries.insert(
                    key.to_string(),
                    StoreEntry::new(StoredValue::Integer(1), Some(window)),
                );
                self.stats.set_total_keys(self.entries.len());
                Ok(1)
            }
        }
    }

    // == Exists ==
    /// Returns true if `key` holds a live value of any kind.
    pub fn exists(&mut self, key: &str) -> bool {
        self.purge_if_expired(key);
        self.entries.contains_key(key)
    }

    // == Rpush ==
    /// Appends `value` to the list at `key`, creating the list if absent.
    ///
    /// Returns the list length after the push.
    pub fn rpush(&mut self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.purge_if_expired(key);

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(StoredValue::List(Vec::new()), None));

        let len = match &mut entry.value {
            StoredValue::List(items) => {
                items.push(value);
                items.len()
            }
            other => return Err(wrong_kind(key, other, "rpush")),
        };

        self.stats.set_total_keys(self.entries.len());
        Ok(len)
    }

    // == Lrange ==
    /// Returns a snapshot of the list at `key` between `start` and `end`, inclusive.
    ///
    /// Negative indices count from the end of the list (`-1` is the last
    /// element). Out-of-range bounds are clamped and an absent key yields an
    /// empty list.
    pub fn lrange(&mut self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>> {
        self.purge_if_expired(key);

        let items = match self.entries.get(key) {
            None => return Ok(Vec::new()),
            Some(entry) => match &entry.value {
                StoredValue::List(items) => items,
                other => return Err(wrong_kind(key, other, "lrange")),
            },
        };

        Ok(match clamp_range(items.len(), start, end) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    // == Ttl ==
    /// Returns the remaining lifetime of `key`, or None if absent or persistent.
    pub fn ttl(&mut self, key: &str) -> Option<Duration> {
        self.purge_if_expired(key);
        self.entries.get(key).and_then(StoreEntry::ttl_remaining)
    }

    // == Flush ==
    /// Removes every key.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.stats.set_total_keys(0);
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_keys(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();

        self.stats.record_expired(removed);
        self.stats.set_total_keys(self.entries.len());
        removed
    }

    /// Returns the number of keys held, including expired keys not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_if_expired(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_keys(self.entries.len());
        }
    }
}

fn increment_entry(key: &str, entry: &mut StoreEntry) -> Result<i64> {
    let current = match &entry.value {
        StoredValue::Integer(n) => *n,
        StoredValue::Bytes(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| {
                CacheError::TypeMismatch(format!("value at '{}' is not an integer", key))
            })?,
        other => return Err(wrong_kind(key, other, "incr")),
    };

    let next = current.checked_add(1).ok_or_else(|| {
        CacheError::TypeMismatch(format!("increment of '{}' would overflow", key))
    })?;
    entry.value = StoredValue::Integer(next);
    Ok(next)
}

fn wrong_kind(key: &str, value: &StoredValue, operation: &str) -> CacheError {
    CacheError::TypeMismatch(format!(
        "{} is not supported on the {} value at '{}'",
        operation,
        value.kind(),
        key
    ))
}

fn validate_ttl(ttl: Option<Duration>) -> Result<()> {
    match ttl {
        Some(ttl) if ttl.is_zero() => Err(CacheError::InvalidRequest(
            "TTL must be greater than zero".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Resolves inclusive, possibly negative, list bounds to a valid index pair.
fn clamp_range(len: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };

    if start > end || start >= len {
        return None;
    }
    Some((start as usize, end as usize))
}
