//! Token Policy Module
//!
//! Knobs controlling how verification codes are slotted, expired and consumed.

use chrono::Duration;

/// Default verification window in seconds (10 minutes)
pub const DEFAULT_WINDOW_SECS: i64 = 600;

/// Default number of digits in generated codes
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest generated code the store will hand out
pub const MIN_CODE_LENGTH: usize = 4;

// == Token Scope ==
/// How many live tokens the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenScope {
    /// One live token overall; issuing for any subject replaces it.
    #[default]
    Global,
    /// One live token per subject.
    PerSubject,
}

impl TokenScope {
    /// Parses `global` or `subject` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "global" => Some(TokenScope::Global),
            "subject" | "per_subject" | "per-subject" => Some(TokenScope::PerSubject),
            _ => None,
        }
    }
}

// == Consumption ==
/// What a successful verification does to the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consumption {
    /// The token is removed; the same code cannot verify twice.
    #[default]
    SingleUse,
    /// The token stays until it expires, is replaced, or is cleared.
    Reusable,
}

// == Token Policy ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Maximum token age at which verification still succeeds
    pub window: Duration,
    pub scope: TokenScope,
    pub consumption: Consumption,
    /// Digits in codes produced by `issue_generated`
    pub code_length: usize,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
            scope: TokenScope::default(),
            consumption: Consumption::default(),
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl TokenPolicy {
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_scope(mut self, scope: TokenScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_consumption(mut self, consumption: Consumption) -> Self {
        self.consumption = consumption;
        self
    }

    /// Lengths below `MIN_CODE_LENGTH` are raised to it.
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length.max(MIN_CODE_LENGTH);
        self
    }

    /// Length `issue_generated` actually uses, even if `code_length` was
    /// set directly on the field.
    pub fn effective_code_length(&self) -> usize {
        self.code_length.max(MIN_CODE_LENGTH)
    }
}
