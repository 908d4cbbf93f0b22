//! Datastore error types.

use thiserror::Error;

/// Errors that can occur in datastore operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write conflicted with another writer.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}
