//! Read-Through Cache Module
//!
//! Serves entities from a local store and falls back to a remote fetcher on
//! miss, populating the store on success.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::{CacheStats, Keyed, LocalStore, RemoteFetcher};
use crate::error::Result;

/// Local store and counters, guarded together.
#[derive(Debug)]
struct CacheState<S> {
    store: S,
    stats: CacheStats,
}

// == Read-Through Cache ==
/// Keyed cache in front of a remote source.
///
/// Failed fetches are never cached: the next `get` for the key goes remote
/// again. Concurrent misses on one key share a single fetch; the lock on the
/// local store is never held while fetching.
pub struct ReadThroughCache<K, V, S, F> {
    state: RwLock<CacheState<S>>,
    fetcher: F,
    /// Per-key gates serializing fetches for the same key
    in_flight: Gates<K>,
    _value: PhantomData<fn() -> V>,
}

impl<K, V, S, F> ReadThroughCache<K, V, S, F>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
    S: LocalStore<K, V>,
    F: RemoteFetcher<K, V>,
{
    // == Constructor ==
    /// Creates a cache over `store`, falling back to `fetcher` on miss.
    pub fn new(store: S, fetcher: F) -> Self {
        Self {
            state: RwLock::new(CacheState {
                store,
                stats: CacheStats::new(),
            }),
            fetcher,
            in_flight: StdMutex::new(HashMap::new()),
            _value: PhantomData,
        }
    }

    // == Get ==
    /// Returns the entity for `key`, fetching and storing it on a miss.
    ///
    /// Remote errors are returned as `CacheError::FetchFailed` carrying the
    /// fetcher's error unchanged.
    pub async fn get(&self, key: &K) -> Result<V> {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        // Declared before the turn so it is dropped after it, on every exit
        // path including cancellation.
        let in_flight = self.enter(key);
        let _turn = in_flight.gate.lock().await;

        // A fetch that finished while we waited may already have filled it.
        match self.recheck(key).await {
            Some(value) => Ok(value),
            None => self.fetch_and_store(key).await,
        }
    }

    // == Invalidate ==
    /// Removes `key` from the local store. Returns true if it was cached.
    pub async fn invalidate(&self, key: &K) -> bool {
        let mut state = self.state.write().await;
        let removed = state.store.erase(key);
        if removed {
            debug!(?key, "Cache entry invalidated");
        }
        removed
    }

    // == Contains ==
    /// Returns true if `key` is cached locally. Never goes remote.
    ///
    /// Counts as an access for stores that track recency.
    pub async fn contains(&self, key: &K) -> bool {
        let mut state = self.state.write().await;
        state.store.read(key).is_some()
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.state.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.store.len());
        stats.set_evictions(state.store.evictions());
        stats
    }

    /// The remote source this cache falls back to.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // == Internals ==

    /// First look at the local store; records the hit or miss.
    async fn lookup(&self, key: &K) -> Option<V> {
        // Write lock: reads may update recency in the store.
        let mut state = self.state.write().await;
        match state.store.read(key) {
            Some(value) => {
                state.stats.record_hit();
                debug!(?key, "Cache hit");
                Some(value)
            }
            None => {
                state.stats.record_miss();
                debug!(?key, "Cache miss");
                None
            }
        }
    }

    /// Second look after winning the key's gate.
    async fn recheck(&self, key: &K) -> Option<V> {
        let mut state = self.state.write().await;
        let value = state.store.read(key)?;
        state.stats.record_coalesced();
        debug!(?key, "Miss answered by concurrent fetch");
        Some(value)
    }

    async fn fetch_and_store(&self, key: &K) -> Result<V> {
        self.state.write().await.stats.record_fetch();

        match self.fetcher.fetch(key).await {
            Ok(value) => {
                let mut state = self.state.write().await;
                state.store.write(key.clone(), value.clone());
                state.stats.record_write();
                debug!(?key, "Fetched entity stored");
                Ok(value)
            }
            Err(err) => {
                self.state.write().await.stats.record_fetch_failure();
                warn!(?key, error = %err, "Remote fetch failed");
                Err(err.into())
            }
        }
    }

    /// Joins (or opens) the fetch gate for `key`.
    fn enter(&self, key: &K) -> InFlight<'_, K> {
        let gate = lock_gates(&self.in_flight)
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        InFlight {
            gates: &self.in_flight,
            key: key.clone(),
            gate,
        }
    }
}

type Gates<K> = StdMutex<HashMap<K, Arc<Mutex<()>>>>;

fn lock_gates<K>(gates: &Gates<K>) -> MutexGuard<'_, HashMap<K, Arc<Mutex<()>>>> {
    // The map is left consistent by every critical section, so a poisoned
    // lock is still safe to use.
    gates.lock().unwrap_or_else(PoisonError::into_inner)
}

// == In-Flight Guard ==
/// A caller's membership in a key's fetch gate. Dropping it removes the gate
/// once nobody else is waiting on it.
struct InFlight<'a, K: Eq + Hash> {
    gates: &'a Gates<K>,
    key: K,
    gate: Arc<Mutex<()>>,
}

impl<K: Eq + Hash> Drop for InFlight<'_, K> {
    fn drop(&mut self) {
        let mut gates = lock_gates(self.gates);
        // Only the map and this guard hold it: nobody else is waiting.
        let idle = gates
            .get(&self.key)
            .map(|current| Arc::ptr_eq(current, &self.gate) && Arc::strong_count(&self.gate) == 2)
            .unwrap_or(false);
        if idle {
            gates.remove(&self.key);
        }
    }
}

impl<K, V, S, F> ReadThroughCache<K, V, S, F>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Keyed<Key = K> + Clone + Send + Sync,
    S: LocalStore<K, V>,
    F: RemoteFetcher<K, V>,
{
    // == Put ==
    /// Writes `value` under its own key without touching the remote source.
    pub async fn put(&self, value: V) {
        let key = value.key();
        let mut state = self.state.write().await;
        state.store.write(key.clone(), value);
        state.stats.record_write();
        debug!(?key, "Entity written to cache");
    }
}
