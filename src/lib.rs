//! TripBook Cache - entity caching and one-time codes for TripBook clients
//!
//! Provides a read-through cache over a remote source and a store of
//! time-bounded, single-use verification codes.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod recovery;
pub mod tasks;
pub mod token;

pub use cache::{Keyed, LocalStore, MemoryStore, ReadThroughCache, RemoteFetcher};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, FetchError, ResetError, Result};
pub use recovery::PasswordRecovery;
pub use tasks::spawn_sweep_task;
pub use token::{Consumption, TokenPolicy, TokenScope, TokenStore};
