//! User profile record, as shown on the TripBook profile screen.

use serde::{Deserialize, Serialize};

use crate::cache::Keyed;

/// Public profile of a traveller. Cached by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub traveled_countries: u32,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bio: String::new(),
            location: String::new(),
            followers: 0,
            following: 0,
            posts_count: 0,
            traveled_countries: 0,
        }
    }
}

impl Keyed for UserProfile {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}
