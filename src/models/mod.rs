//! Domain records served through the cache

pub mod account;
pub mod profile;

pub use account::Account;
pub use profile::UserProfile;
