use thiserror::Error;

/// Errors returned by [`JugglerStore`](crate::JugglerStore) operations.
///
/// Every `rusqlite` error is translated into one of these before it leaves
/// the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or delete matched no row.
    #[error("{message}")]
    NotFound { message: String },

    /// An insert collided with an existing name.
    #[error("{message}")]
    Duplicate {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Any other storage failure.
    #[error("{message}")]
    Fault {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    Duplicate,
    Fault,
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound {
            message: message.into(),
        }
    }

    pub(crate) fn fault(message: impl Into<String>, source: rusqlite::Error) -> Self {
        StoreError::Fault {
            message: message.into(),
            source,
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::NotFound { .. } => StoreErrorKind::NotFound,
            StoreError::Duplicate { .. } => StoreErrorKind::Duplicate,
            StoreError::Fault { .. } => StoreErrorKind::Fault,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == StoreErrorKind::NotFound
    }

    pub fn is_duplicate(&self) -> bool {
        self.kind() == StoreErrorKind::Duplicate
    }
}

/// True when `err` is SQLite refusing a row because of a UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
