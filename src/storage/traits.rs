//! Storage traits and error types
//!
//! This module defines the read-only baseline interface used during a run and
//! the full storage interface used to persist a run's results afterwards.

use crate::record::{Content, ContentStub};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error for {path}: {source}")]
    Serialization {
        path: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Previously persisted contents, as seen by a collection run
///
/// A run only reads its baseline. Implementations decide what "known" means
/// for their keying scheme.
pub trait Baseline {
    /// Returns true if the stub must be skipped without fetching its details
    fn is_known(&self, stub: &ContentStub) -> StorageResult<bool>;

    /// Returns the stored version of the stub's content, if any
    ///
    /// Consulted only for stubs that are not known, to tell a re-published
    /// content with identical rows from a changed one.
    fn prior_version(&self, stub: &ContentStub) -> StorageResult<Option<Content>>;
}

/// Trait for storage backend implementations
pub trait Storage: Baseline {
    /// Persists a content together with its items
    ///
    /// Replaces an earlier version stored under the same key where the
    /// backend keys by something other than the content identity.
    fn add_content(&mut self, content: &Content) -> StorageResult<()>;

    /// Counts the stored contents
    fn content_count(&self) -> StorageResult<u64>;
}
