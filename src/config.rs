use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the database location.
pub const DB_PATH_ENV: &str = "JUGGLERS_DB";

/// File used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "jugglers.sqlite";

const IN_MEMORY: &str = ":memory:";

/// Juggler store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// A private database that disappears with the connection.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    /// Read `JUGGLERS_DB`, falling back to [`DEFAULT_DB_PATH`].
    pub fn from_env() -> Self {
        match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    /// An explicit path wins; otherwise defer to [`StoreConfig::from_env`].
    pub fn resolve(db_path: Option<PathBuf>) -> Self {
        db_path.map(Self::new).unwrap_or_else(Self::from_env)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }
}
