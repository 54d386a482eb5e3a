//! Token Store Module
//!
//! Issues, verifies and clears time-bounded one-time codes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::token::{generate_code, Consumption, TokenPolicy, TokenScope, VerificationToken};

/// Where a token lives; issuing into an occupied slot replaces its token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Global,
    Subject(String),
}

// == Token Store ==
/// Holds live verification codes behind a single lock.
///
/// Expiry is evaluated lazily by `verify`; expired tokens stay stored until
/// replaced, cleared, or removed by `purge_expired`. `verify` never reports
/// why it failed.
pub struct TokenStore {
    tokens: Mutex<HashMap<Slot, VerificationToken>>,
    policy: TokenPolicy,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    // == Constructor ==
    /// Creates a store reading wall-clock time.
    pub fn new(policy: TokenPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: TokenPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    // == Issue ==
    /// Records `code` for `subject`, replacing whatever occupied its slot.
    ///
    /// An empty code is refused and leaves the store unchanged.
    pub async fn issue(&self, subject: &str, code: &str) {
        if code.is_empty() {
            warn!(subject, "Refusing to issue an empty verification code");
            return;
        }

        let token = VerificationToken::new(subject, code, self.clock.now());
        let slot = self.slot_for(subject);

        let replaced = self.tokens.lock().await.insert(slot, token);
        match replaced {
            Some(previous) if previous.subject != subject => {
                info!(subject, replaced_subject = %previous.subject, "Verification code issued, replacing another subject's code");
            }
            Some(_) => info!(subject, "Verification code reissued"),
            None => info!(subject, "Verification code issued"),
        }
    }

    // == Issue Generated ==
    /// Issues a fresh random numeric code for `subject` and returns it.
    pub async fn issue_generated(&self, subject: &str) -> String {
        let code = generate_code(self.policy.effective_code_length());
        self.issue(subject, &code).await;
        code
    }

    // == Verify ==
    /// Returns true iff a live token for `subject` carries exactly `code`.
    ///
    /// An empty code never verifies. Under `Consumption::SingleUse` a
    /// successful check removes the token.
    pub async fn verify(&self, subject: &str, code: &str) -> bool {
        if code.is_empty() {
            debug!(subject, "Verification failed: empty code");
            return false;
        }

        let now = self.clock.now();
        let slot = self.slot_for(subject);
        let mut tokens = self.tokens.lock().await;

        let Some(token) = tokens.get(&slot) else {
            debug!(subject, "Verification failed: no code issued");
            return false;
        };

        if !token.matches(subject, code) {
            debug!(subject, "Verification failed: subject or code mismatch");
            return false;
        }

        if token.is_expired(now, self.policy.window) {
            debug!(subject, issued_at = %token.issued_at, "Verification failed: code expired");
            return false;
        }

        if self.policy.consumption == Consumption::SingleUse {
            tokens.remove(&slot);
        }
        info!(subject, "Verification succeeded");
        true
    }

    // == Clear ==
    /// Removes every stored token, whatever its subject.
    pub async fn clear(&self) {
        let mut tokens = self.tokens.lock().await;
        let count = tokens.len();
        tokens.clear();
        debug!(count, "Verification codes cleared");
    }

    // == Clear Subject ==
    /// Removes the token issued to `subject`, if it is still the live one.
    pub async fn clear_subject(&self, subject: &str) -> bool {
        let slot = self.slot_for(subject);
        let mut tokens = self.tokens.lock().await;

        let owned = tokens
            .get(&slot)
            .map(|token| token.subject == subject)
            .unwrap_or(false);
        if owned {
            tokens.remove(&slot);
            debug!(subject, "Verification code cleared");
        }
        owned
    }

    // == Purge Expired ==
    /// Drops tokens past their window. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let window = self.policy.window;
        let mut tokens = self.tokens.lock().await;

        let before = tokens.len();
        tokens.retain(|_, token| !token.is_expired(now, window));
        before - tokens.len()
    }

    /// Number of stored tokens, expired ones included.
    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn slot_for(&self, subject: &str) -> Slot {
        match self.policy.scope {
            TokenScope::Global => Slot::Global,
            TokenScope::PerSubject => Slot::Subject(subject.to_string()),
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(TokenPolicy::default())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::token::MIN_CODE_LENGTH;
    use chrono::{Duration, TimeZone, Utc};

    fn store_with(policy: TokenPolicy) -> (TokenStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap(),
        ));
        (TokenStore::with_clock(policy, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;

        assert!(store.verify("a@x.com", "111111").await);
    }

    #[tokio::test]
    async fn test_verify_after_window_fails() {
        let (store, clock) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;
        clock.advance(Duration::minutes(10) + Duration::seconds(1));

        assert!(!store.verify("a@x.com", "111111").await);
        // Expiry is lazy: the token is still stored.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_verify_at_exact_window_succeeds() {
        let (store, clock) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;
        clock.advance(Duration::minutes(10));

        assert!(store.verify("a@x.com", "111111").await);
    }

    #[tokio::test]
    async fn test_verify_without_issue() {
        let (store, _) = store_with(TokenPolicy::default());
        assert!(!store.verify("b@x.com", "000000").await);
    }

    #[tokio::test]
    async fn test_global_scope_replaces_other_subject() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;
        store.issue("c@y.com", "222222").await;

        assert!(!store.verify("a@x.com", "111111").await);
        assert!(store.verify("c@y.com", "222222").await);
    }

    #[tokio::test]
    async fn test_per_subject_scope_keeps_both() {
        let (store, _) = store_with(TokenPolicy::default().with_scope(TokenScope::PerSubject));

        store.issue("a@x.com", "111111").await;
        store.issue("c@y.com", "222222").await;

        assert_eq!(store.len().await, 2);
        assert!(store.verify("a@x.com", "111111").await);
        assert!(store.verify("c@y.com", "222222").await);
    }

    #[tokio::test]
    async fn test_reissue_replaces_code() {
        let (store, _) = store_with(TokenPolicy::default().with_scope(TokenScope::PerSubject));

        store.issue("a@x.com", "111111").await;
        store.issue("a@x.com", "333333").await;

        assert!(!store.verify("a@x.com", "111111").await);
        assert!(store.verify("a@x.com", "333333").await);
    }

    #[tokio::test]
    async fn test_single_use_consumes() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;

        assert!(store.verify("a@x.com", "111111").await);
        assert!(!store.verify("a@x.com", "111111").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_reusable_allows_repeat_within_window() {
        let (store, clock) =
            store_with(TokenPolicy::default().with_consumption(Consumption::Reusable));

        store.issue("a@x.com", "111111").await;

        assert!(store.verify("a@x.com", "111111").await);
        clock.advance(Duration::minutes(5));
        assert!(store.verify("a@x.com", "111111").await);
        clock.advance(Duration::minutes(5) + Duration::seconds(1));
        assert!(!store.verify("a@x.com", "111111").await);
    }

    #[tokio::test]
    async fn test_failed_verify_does_not_consume() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;

        assert!(!store.verify("a@x.com", "999999").await);
        assert!(!store.verify("z@x.com", "111111").await);
        assert!(store.verify("a@x.com", "111111").await);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (store, _) = store_with(TokenPolicy::default().with_scope(TokenScope::PerSubject));

        store.issue("a@x.com", "111111").await;
        store.issue("c@y.com", "222222").await;
        store.clear().await;

        assert!(!store.verify("a@x.com", "111111").await);
        assert!(!store.verify("c@y.com", "222222").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_subject_only_removes_own_token() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "111111").await;

        assert!(!store.clear_subject("c@y.com").await);
        assert!(store.clear_subject("a@x.com").await);
        assert!(!store.verify("a@x.com", "111111").await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (store, clock) = store_with(TokenPolicy::default().with_scope(TokenScope::PerSubject));

        store.issue("old@x.com", "111111").await;
        clock.advance(Duration::minutes(8));
        store.issue("new@x.com", "222222").await;
        clock.advance(Duration::minutes(3));

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.verify("new@x.com", "222222").await);
    }

    #[tokio::test]
    async fn test_zero_code_length_never_yields_empty_code() {
        let (store, _) = store_with(TokenPolicy::default().with_code_length(0));

        let code = store.issue_generated("a@x.com").await;

        assert_eq!(code.len(), MIN_CODE_LENGTH);
        assert!(!store.verify("a@x.com", "").await);
        assert!(store.verify("a@x.com", &code).await);
    }

    #[tokio::test]
    async fn test_raw_zero_code_length_still_clamped() {
        let policy = TokenPolicy {
            code_length: 0,
            ..TokenPolicy::default()
        };
        let (store, _) = store_with(policy);

        let code = store.issue_generated("a@x.com").await;

        assert_eq!(code.len(), MIN_CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_empty_code_is_not_issued() {
        let (store, _) = store_with(TokenPolicy::default());

        store.issue("a@x.com", "").await;

        assert!(store.is_empty().await);
        assert!(!store.verify("a@x.com", "").await);
    }

    #[tokio::test]
    async fn test_issue_generated_verifies() {
        let (store, _) = store_with(TokenPolicy::default().with_code_length(8));

        let code = store.issue_generated("a@x.com").await;

        assert_eq!(code.len(), 8);
        assert!(store.verify("a@x.com", &code).await);
    }
}
