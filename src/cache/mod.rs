//! Cache Module
//!
//! Read-through caching of remote entities over a local key-value store.

mod entry;
mod fetcher;
mod lru;
mod read_through;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fetcher::{Keyed, RemoteFetcher};
pub use lru::LruTracker;
pub use read_through::ReadThroughCache;
pub use stats::CacheStats;
pub use store::{LocalStore, MemoryStore};
