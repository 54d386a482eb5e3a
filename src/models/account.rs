//! Login account record used by password recovery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::Keyed;

/// A registered account. Cached by email, the identity recovery works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: u64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

impl Keyed for Account {
    type Key = String;

    fn key(&self) -> String {
        self.email.clone()
    }
}
