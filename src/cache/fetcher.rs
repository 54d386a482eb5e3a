//! Remote Fetcher Module
//!
//! The slow, authoritative source a read-through cache falls back to.

use async_trait::async_trait;

use crate::error::FetchError;

/// Authoritative source for entities of type `V` keyed by `K`.
///
/// Retry and timeout policy belong to the implementation; the cache calls
/// `fetch` once per miss and passes any error through unchanged.
#[async_trait]
pub trait RemoteFetcher<K, V>: Send + Sync {
    async fn fetch(&self, key: &K) -> Result<V, FetchError>;
}

/// An entity that knows the key it is cached under.
pub trait Keyed {
    type Key;

    fn key(&self) -> Self::Key;
}
