use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier carried by a record that has not been stored yet.
pub const NO_ID: i64 = -1;

/// A juggler and their recorded number of catches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Juggler {
    pub name: String,
    pub country: String,
    pub catches: u32,
    /// SQLite rowid, or [`NO_ID`] until the store assigns one.
    #[serde(default = "no_id")]
    pub id: i64,
}

fn no_id() -> i64 {
    NO_ID
}

impl Juggler {
    /// Create an unsaved record
    pub fn new(name: impl Into<String>, country: impl Into<String>, catches: u32) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            catches,
            id: NO_ID,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != NO_ID
    }
}

impl fmt::Display for Juggler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Country: {}, Catches: {}",
            self.id, self.name, self.country, self.catches
        )
    }
}
