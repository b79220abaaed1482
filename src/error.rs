use std::path::PathBuf;

use crate::models::Field;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to open database at {path:?}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{field} must not be empty")]
    Validation { field: Field },

    #[error("no teacher with id {0}")]
    NotFound(i64),

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),
}

/// Coarse classification the controller maps to user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Validation,
    NotFound,
    Store,
}

impl RosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::Connection { .. } => ErrorKind::Connection,
            RosterError::Validation { .. } => ErrorKind::Validation,
            RosterError::NotFound(_) => ErrorKind::NotFound,
            RosterError::Store(_) | RosterError::Migration(_) => ErrorKind::Store,
        }
    }
}
