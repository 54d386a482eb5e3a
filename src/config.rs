//! Configuration Module
//!
//! Handles loading cache and token settings from environment variables.

use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::token::{Consumption, TokenPolicy, TokenScope, DEFAULT_CODE_LENGTH, DEFAULT_WINDOW_SECS};

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Local store capacity, 0 = unbounded
    pub max_entries: usize,
    /// Verification window in seconds
    pub token_window: i64,
    /// One live token overall, or one per subject
    pub token_scope: TokenScope,
    /// Whether a successful verification consumes the token
    pub token_single_use: bool,
    /// Digits in generated codes
    pub code_length: usize,
    /// Background token sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Local store capacity (default: 0, unbounded)
    /// - `TOKEN_WINDOW_SECS` - Verification window (default: 600)
    /// - `TOKEN_SCOPE` - `global` or `subject` (default: global)
    /// - `TOKEN_SINGLE_USE` - Consume on success (default: true)
    /// - `TOKEN_CODE_LENGTH` - Generated code digits (default: 6)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            token_window: parse_var("TOKEN_WINDOW_SECS")
                .filter(|secs: &i64| *secs > 0)
                .unwrap_or(defaults.token_window),
            token_scope: env::var("TOKEN_SCOPE")
                .ok()
                .and_then(|v| TokenScope::parse(&v))
                .unwrap_or(defaults.token_scope),
            token_single_use: parse_var("TOKEN_SINGLE_USE").unwrap_or(defaults.token_single_use),
            code_length: parse_var("TOKEN_CODE_LENGTH")
                .filter(|len: &usize| *len > 0)
                .unwrap_or(defaults.code_length),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Builds the token policy these settings describe.
    pub fn token_policy(&self) -> TokenPolicy {
        let consumption = if self.token_single_use {
            Consumption::SingleUse
        } else {
            Consumption::Reusable
        };

        TokenPolicy::default()
            .with_window(Duration::seconds(self.token_window))
            .with_scope(self.token_scope)
            .with_consumption(consumption)
            .with_code_length(self.code_length)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 0,
            token_window: DEFAULT_WINDOW_SECS,
            token_scope: TokenScope::Global,
            token_single_use: true,
            code_length: DEFAULT_CODE_LENGTH,
            sweep_interval: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
