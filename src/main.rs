//! TripBook Cache demo
//!
//! Wires the profile cache, account cache and token store against an
//! in-process directory and walks through a profile read and a password
//! reset, logging each step.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripbook_cache::models::{Account, UserProfile};
use tripbook_cache::{
    spawn_sweep_task, Config, FetchError, MemoryStore, PasswordRecovery, ReadThroughCache,
    RemoteFetcher, TokenStore,
};

type ProfileCache =
    ReadThroughCache<String, UserProfile, MemoryStore<String, UserProfile>, Directory>;

/// Stand-in for the TripBook backend.
struct Directory {
    accounts: HashMap<String, Account>,
    profiles: HashMap<String, UserProfile>,
}

impl Directory {
    fn seeded() -> Self {
        let mut profile = UserProfile::new("u-1", "Amina Bello");
        profile.location = "Douala".to_string();
        profile.traveled_countries = 9;

        Self {
            accounts: HashMap::from([(
                "amina@tripbook.app".to_string(),
                Account::new(1, "amina@tripbook.app"),
            )]),
            profiles: HashMap::from([(profile.id.clone(), profile)]),
        }
    }
}

#[async_trait]
impl RemoteFetcher<String, Account> for Directory {
    async fn fetch(&self, key: &String) -> Result<Account, FetchError> {
        self.accounts
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("account {}", key)))
    }
}

#[async_trait]
impl RemoteFetcher<String, UserProfile> for Directory {
    async fn fetch(&self, key: &String) -> Result<UserProfile, FetchError> {
        self.profiles
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("profile {}", key)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripbook_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, token_window={}s, scope={:?}, single_use={}, sweep_interval={}s",
        config.max_entries,
        config.token_window,
        config.token_scope,
        config.token_single_use,
        config.sweep_interval
    );

    let tokens = Arc::new(TokenStore::new(config.token_policy()));
    let sweep_handle = spawn_sweep_task(tokens.clone(), config.sweep_interval);

    // Profile reads: the second one is served locally.
    let profiles: ProfileCache = ReadThroughCache::new(
        MemoryStore::with_capacity(config.max_entries),
        Directory::seeded(),
    );
    let profile = profiles.get(&"u-1".to_string()).await?;
    info!(name = %profile.name, location = %profile.location, "Profile loaded");
    profiles.get(&"u-1".to_string()).await?;
    let stats = serde_json::to_string(&profiles.stats().await)
        .context("serializing profile cache stats")?;
    info!(%stats, "Profile cache stats");

    // Password reset: unknown email is refused, known email gets a code.
    let accounts = Arc::new(ReadThroughCache::new(
        MemoryStore::with_capacity(config.max_entries),
        Directory::seeded(),
    ));
    let recovery = PasswordRecovery::new(accounts, tokens.clone());

    if let Err(err) = recovery.request_reset("nobody@tripbook.app").await {
        warn!(error = %err, "Reset for unknown email refused as expected");
    }

    let code = recovery.request_reset("amina@tripbook.app").await?;
    let first = recovery.confirm_reset("amina@tripbook.app", &code).await;
    let second = recovery.confirm_reset("amina@tripbook.app", &code).await;
    info!(first, second, "Reset code checked twice");

    sweep_handle.abort();
    info!("Demo complete");
    Ok(())
}
