//! Verification Token Module

use std::fmt;

use chrono::{DateTime, Duration, Utc};

// == Verification Token ==
/// A one-time code issued to a subject (usually an email address).
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub subject: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(subject: impl Into<String>, code: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            subject: subject.into(),
            code: code.into(),
            issued_at,
        }
    }

    // == Is Expired ==
    /// A token is live while `now - issued_at <= window`; at exactly the
    /// window it still verifies.
    pub fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.issued_at > window
    }

    pub fn expires_at(&self, window: Duration) -> DateTime<Utc> {
        self.issued_at + window
    }

    /// Exact match on both subject and code.
    pub fn matches(&self, subject: &str, code: &str) -> bool {
        self.subject == subject && self.code == code
    }
}

// Codes stay out of logs and panic messages.
impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationToken")
            .field("subject", &self.subject)
            .field("code", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let token = VerificationToken::new("a@x.com", "111111", issued());
        let window = Duration::minutes(10);

        assert!(!token.is_expired(issued(), window));
        assert!(!token.is_expired(issued() + window, window));
        assert!(token.is_expired(issued() + window + Duration::milliseconds(1), window));
        assert_eq!(token.expires_at(window), issued() + Duration::minutes(10));
    }

    #[test]
    fn test_matches_is_exact() {
        let token = VerificationToken::new("a@x.com", "111111", issued());

        assert!(token.matches("a@x.com", "111111"));
        assert!(!token.matches("A@x.com", "111111"));
        assert!(!token.matches("a@x.com", "111112"));
        assert!(!token.matches("a@x.com", " 111111"));
    }

    #[test]
    fn test_debug_redacts_code() {
        let token = VerificationToken::new("a@x.com", "987654", issued());
        let rendered = format!("{:?}", token);

        assert!(rendered.contains("a@x.com"));
        assert!(!rendered.contains("987654"));
    }
}
