//! Token Module
//!
//! Short-lived, single-use verification codes (OTP) for account recovery.

mod code;
mod policy;
mod store;
mod verification;

#[cfg(test)]
mod property_tests;

pub use code::generate_code;
pub use policy::{
    Consumption, TokenPolicy, TokenScope, DEFAULT_CODE_LENGTH, DEFAULT_WINDOW_SECS, MIN_CODE_LENGTH,
};
pub use store::TokenStore;
pub use verification::VerificationToken;
