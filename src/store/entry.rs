//! Store Entry Module
//!
//! Defines the value kinds a key can hold and the per-key expiry metadata.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// The kinds of value a key can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    /// Opaque byte sequence
    Bytes(Vec<u8>),
    /// Integer counter; reads back as decimal ASCII
    Integer(i64),
    /// Ordered sequence of byte entries
    List(Vec<Vec<u8>>),
}

impl StoredValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Bytes(_) => "bytes",
            StoredValue::Integer(_) => "integer",
            StoredValue::List(_) => "list",
        }
    }
}

// == Store Entry ==
/// A single key's value with expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry, expiring `ttl` after now if given.
    pub fn new(value: StoredValue, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| current_timestamp_ms().saturating_add(duration_ms(ttl)));
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Checks expiry against an explicit timestamp.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            Duration::from_millis(expires.saturating_sub(now))
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
