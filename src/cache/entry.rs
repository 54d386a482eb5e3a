//! Cache Entry Module
//!
//! Defines the structure for individual entries held by a local store.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A single cached entity and the key it is stored under.
///
/// Entries carry no TTL: they live until overwritten, erased, or evicted by
/// a capacity-bounded store.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<K, V> {
    /// Identifier of the cached entity
    pub key: K,
    /// The cached payload
    pub value: V,
    /// When this entry was written
    pub stored_at: DateTime<Utc>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            stored_at: Utc::now(),
        }
    }

    // == Age ==
    /// Returns how long ago this entry was written, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.stored_at
    }
}
