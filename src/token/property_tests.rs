//! Property-Based Tests for Token Module

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::Arc;

use crate::clock::ManualClock;
use crate::token::{Consumption, TokenPolicy, TokenScope, TokenStore};

fn store_with(policy: TokenPolicy) -> (TokenStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    (TokenStore::with_clock(policy, clock.clone()), clock)
}

fn block_on<T>(fut: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(fut)
}

fn subject_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}@[a-z]{1,6}\\.com".prop_map(|s| s)
}

fn code_strategy() -> impl Strategy<Value = String> {
    "[0-9]{6}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Verification succeeds exactly while the token's age is within the window.
    #[test]
    fn prop_expiry_window(
        subject in subject_strategy(),
        code in code_strategy(),
        window_secs in 1i64..3600,
        elapsed_secs in 0i64..7200
    ) {
        let policy = TokenPolicy::default().with_window(Duration::seconds(window_secs));
        let (store, clock) = store_with(policy);

        let verified = block_on(async {
            store.issue(&subject, &code).await;
            clock.advance(Duration::seconds(elapsed_secs));
            store.verify(&subject, &code).await
        });

        prop_assert_eq!(verified, elapsed_secs <= window_secs);
    }

    // Any code other than the issued one is rejected and leaves the token usable.
    #[test]
    fn prop_wrong_code_rejected(
        subject in subject_strategy(),
        code in code_strategy(),
        guess in code_strategy()
    ) {
        prop_assume!(code != guess);
        let (store, _) = store_with(TokenPolicy::default());

        let (wrong, right) = block_on(async {
            store.issue(&subject, &code).await;
            let wrong = store.verify(&subject, &guess).await;
            let right = store.verify(&subject, &code).await;
            (wrong, right)
        });

        prop_assert!(!wrong);
        prop_assert!(right);
    }

    // In global scope only the most recently issued subject can verify.
    #[test]
    fn prop_global_scope_last_issue_wins(
        issued in prop::collection::vec((subject_strategy(), code_strategy()), 1..10)
    ) {
        let policy = TokenPolicy::default().with_consumption(Consumption::Reusable);
        let (store, _) = store_with(policy);
        let (last_subject, last_code) = issued.last().cloned().unwrap();

        let results = block_on(async {
            for (subject, code) in &issued {
                store.issue(subject, code).await;
            }
            let mut results = Vec::new();
            for (subject, code) in &issued {
                results.push(store.verify(subject, code).await);
            }
            results
        });

        for ((subject, code), ok) in issued.iter().zip(results) {
            let expected = subject == &last_subject && code == &last_code;
            prop_assert_eq!(ok, expected);
        }
        prop_assert_eq!(block_on(store.len()), 1);
    }

    // Single-use tokens verify at most once, however often they are presented.
    #[test]
    fn prop_single_use_at_most_once(
        subject in subject_strategy(),
        code in code_strategy(),
        attempts in 1usize..10,
        per_subject in any::<bool>()
    ) {
        let scope = if per_subject { TokenScope::PerSubject } else { TokenScope::Global };
        let (store, _) = store_with(TokenPolicy::default().with_scope(scope));

        let successes = block_on(async {
            store.issue(&subject, &code).await;
            let mut successes = 0;
            for _ in 0..attempts {
                if store.verify(&subject, &code).await {
                    successes += 1;
                }
            }
            successes
        });

        prop_assert_eq!(successes, 1);
    }
}
