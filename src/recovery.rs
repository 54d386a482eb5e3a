//! Password Recovery Module
//!
//! Ties the account cache to the token store: a reset code is only issued
//! for an email the account source knows.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{LocalStore, ReadThroughCache, RemoteFetcher};
use crate::error::{ResetError, Result};
use crate::models::Account;
use crate::token::TokenStore;

/// Account cache keyed by email.
pub type AccountCache<S, F> = ReadThroughCache<String, Account, S, F>;

// == Password Recovery ==
pub struct PasswordRecovery<S, F> {
    accounts: Arc<AccountCache<S, F>>,
    tokens: Arc<TokenStore>,
}

impl<S, F> PasswordRecovery<S, F>
where
    S: LocalStore<String, Account>,
    F: RemoteFetcher<String, Account>,
{
    pub fn new(accounts: Arc<AccountCache<S, F>>, tokens: Arc<TokenStore>) -> Self {
        Self { accounts, tokens }
    }

    // == Request Reset ==
    /// Issues a reset code for `email` and returns it for delivery.
    ///
    /// Fails with the account source's error (typically `NotFound`) when the
    /// email cannot be resolved; no code is issued in that case.
    pub async fn request_reset(&self, email: &str) -> Result<String> {
        let account = match self.accounts.get(&email.to_string()).await {
            Ok(account) => account,
            Err(err) => {
                warn!(email, error = %err, "Password reset refused");
                return Err(err);
            }
        };

        let code = self.tokens.issue_generated(&account.email).await;
        info!(
            email,
            account_id = account.id,
            valid_for_secs = self.tokens.policy().window.num_seconds(),
            "Password reset code ready for delivery"
        );
        Ok(code)
    }

    // == Confirm Reset ==
    /// Checks the code the user typed back.
    ///
    /// `email` is resolved the same way `request_reset` resolved it, so any
    /// spelling the account source accepts reaches the issued code.
    pub async fn confirm_reset(&self, email: &str, code: &str) -> bool {
        match self.subject_for(email).await {
            Some(subject) => self.tokens.verify(&subject, code).await,
            None => false,
        }
    }

    // == Complete Reset ==
    /// Validates the new password, then consumes the code.
    ///
    /// Password checks run first so a typo in the confirmation does not burn
    /// a valid code. Storing the new password is left to the caller.
    pub async fn complete_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> std::result::Result<(), ResetError> {
        if new_password != confirm_password {
            return Err(ResetError::PasswordMismatch);
        }

        let problems = password_problems(new_password);
        if !problems.is_empty() {
            return Err(ResetError::WeakPassword(problems.join("; ")));
        }

        if !self.confirm_reset(email, code).await {
            warn!(email, "Password reset rejected: invalid or expired code");
            return Err(ResetError::InvalidCode);
        }

        info!(email, "Password reset accepted");
        Ok(())
    }

    // == Cancel ==
    /// Abandons the flow for `email`, invalidating its outstanding code.
    pub async fn cancel(&self, email: &str) -> bool {
        match self.subject_for(email).await {
            Some(subject) => self.tokens.clear_subject(&subject).await,
            None => false,
        }
    }

    pub fn accounts(&self) -> &AccountCache<S, F> {
        &self.accounts
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The subject codes are issued under: the email the account source
    /// returns, not the one the caller typed.
    async fn subject_for(&self, email: &str) -> Option<String> {
        self.accounts
            .get(&email.to_string())
            .await
            .ok()
            .map(|account| account.email)
    }
}

// == Password Strength ==
/// Minimum length for a new password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lists every strength rule `password` breaks; empty means acceptable.
pub fn password_problems(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain at least one number");
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        problems.push("Password must contain at least one special character");
    }

    problems
}
