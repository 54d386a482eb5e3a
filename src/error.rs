//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Fetch Error Enum ==
/// Failure reported by a remote source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote source has no entity for the key
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Transient transport failure
    #[error("Network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Returns true for failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

// == Cache Error Enum ==
/// Unified error type for cache reads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Remote fetch failed on a cache miss
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] FetchError),
}

impl CacheError {
    /// Returns the remote error exactly as the fetcher reported it.
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            CacheError::FetchFailed(err) => err,
        }
    }
}

// == Reset Error Enum ==
/// Why a password reset was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Every strength rule the new password breaks
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Code wrong, expired, already used, or email unknown
    #[error("Invalid or expired code")]
    InvalidCode,
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
