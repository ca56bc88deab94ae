//! Error types for the roster engine
//!
//! Every operation reports failure at the point of detection; nothing is
//! swallowed inside the engine. The front-end decides how each kind is
//! rendered and whether the user gets to retry.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the roster engine
#[derive(Error, Debug)]
pub enum RosterError {
    /// Add with an id that is already present. The store is unchanged.
    #[error("student id '{id}' already exists")]
    DuplicateId { id: String },

    /// Update or delete referencing an absent id. The store is unchanged.
    #[error("student id '{id}' not found")]
    NotFound { id: String },

    /// A row in the persisted file cannot be decoded. Aborts the whole
    /// load; row ids are not guaranteed unique, so a partial import would
    /// be ambiguous to recover from.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Load target does not exist. Callers treat this as "no prior data"
    /// and proceed with an empty store.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Underlying read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    /// Whether the caller can carry on after surfacing this error:
    /// retry with different input, or start from an empty store for a
    /// missing file. `MalformedRow` and `Io` abort the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterError::DuplicateId { .. }
                | RosterError::NotFound { .. }
                | RosterError::FileNotFound { .. }
        )
    }
}

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
