//! SQLite persistence for juggler catch records.
//!
//! # Intention
//!
//! - Provide a single owner for the juggler database connection.
//! - Encapsulate SQLite-specific logic, types, and error handling so callers
//!   only ever see [`Juggler`] and [`StoreError`].
//!
//! # Architectural Boundaries
//!
//! - Only record and database code belongs here.
//! - Command-line handling lives in the `jugglers` binary.

pub mod config;
pub mod error;
pub mod record;
pub mod sqlite;

pub use config::StoreConfig;
pub use error::{Result, StoreError, StoreErrorKind};
pub use record::{Juggler, NO_ID};
pub use sqlite::JugglerStore;
