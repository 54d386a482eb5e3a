//! Local Store Module
//!
//! The fast key-value surface a read-through cache fronts, and an in-memory
//! implementation with optional LRU capacity bound.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::{CacheEntry, LruTracker};

// == Local Store Trait ==
/// Synchronous, always-available key-value storage.
///
/// `read` takes `&mut self` so stores that track recency can record the
/// access. Implementations must keep at most one value per key.
pub trait LocalStore<K, V>: Send + Sync {
    /// Returns a copy of the value stored under `key`, if any.
    fn read(&mut self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn write(&mut self, key: K, value: V);

    /// Removes `key`. Returns true if an entry was present.
    fn erase(&mut self, key: &K) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Entries the store dropped on its own to stay within a bound.
    fn evictions(&self) -> u64 {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Memory Store ==
/// HashMap-backed local store.
///
/// With `max_entries == 0` the store is unbounded and never drops an entry on
/// its own. With a bound, writing a new key at capacity evicts the least
/// recently used entry.
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<K, V>>,
    /// LRU access tracker, only maintained when bounded
    lru: LruTracker<K>,
    /// Maximum number of entries allowed, 0 = unbounded
    max_entries: usize,
    /// Entries dropped to honour the bound
    evictions: u64,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a store holding at most `max_entries` entries (0 = unbounded).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries,
            evictions: 0,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_entries > 0
    }

    /// Returns the full entry, including when it was written.
    pub fn entry(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        self.entries.get(key)
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LocalStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn read(&mut self, key: &K) -> Option<V> {
        let value = self.entries.get(key).map(|entry| entry.value.clone())?;
        if self.is_bounded() {
            self.lru.touch(key);
        }
        Some(value)
    }

    fn write(&mut self, key: K, value: V) {
        let is_overwrite = self.entries.contains_key(&key);

        if self.is_bounded() && !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.evictions += 1;
            }
        }

        if self.is_bounded() {
            self.lru.touch(&key);
        }
        self.entries
            .insert(key.clone(), CacheEntry::new(key, value));
    }

    fn erase(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            if self.is_bounded() {
                self.lru.remove(key);
            }
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn evictions(&self) -> u64 {
        self.evictions
    }
}
