//! Token Sweep Task
//!
//! Background task that periodically removes expired verification codes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::token::TokenStore;

/// Spawns a background task that purges expired tokens every
/// `sweep_interval_secs` seconds.
///
/// Verification already rejects expired tokens on its own; the sweep only
/// bounds how long they stay in memory. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let tokens = Arc::new(TokenStore::default());
/// let sweep_handle = spawn_sweep_task(tokens.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(tokens: Arc<TokenStore>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting token sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = tokens.purge_expired().await;

            if removed > 0 {
                info!("Token sweep: removed {} expired codes", removed);
            } else {
                debug!("Token sweep: no expired codes found");
            }
        }
    })
}
