//! Storage module for persisting collected bulletins
//!
//! This module handles everything that outlives a run, including:
//! - Flat-file JSON documents with the current-year re-check policy
//! - The SQLite content and item tables
//! - An in-memory baseline for dry runs and tests

mod json;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use json::{file_key, JsonStorage, RecheckPolicy};
pub use memory::MemoryBaseline;
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Baseline, Storage, StorageError, StorageResult};

use crate::config::{StorageBackend, StorageConfig};
use crate::record::Content;
use crate::IsbnError;

/// Opens the configured storage backend
///
/// # Arguments
///
/// * `config` - The storage section of the configuration
///
/// # Returns
///
/// * `Ok(Box<dyn Storage>)` - The opened backend
/// * `Err(IsbnError)` - The data directory or database could not be opened
pub fn open_storage(config: &StorageConfig) -> Result<Box<dyn Storage>, IsbnError> {
    let storage: Box<dyn Storage> = match config.backend {
        StorageBackend::Json => {
            let policy = RecheckPolicy::current_year(
                config.recheck_current_year,
                config.frozen_channels.clone(),
            );
            tracing::info!(
                "Using JSON store at {} (re-check year {}: {})",
                config.data_dir.display(),
                policy.year,
                policy.enabled
            );
            Box::new(JsonStorage::new(&config.data_dir, policy)?)
        }
        StorageBackend::Sqlite => {
            tracing::info!("Using SQLite store at {}", config.database_path.display());
            Box::new(SqliteStorage::new(&config.database_path)?)
        }
    };
    Ok(storage)
}

/// Persists every reported content, stopping at the first failure
pub fn persist<S: Storage + ?Sized>(storage: &mut S, contents: &[Content]) -> StorageResult<()> {
    for content in contents {
        storage.add_content(content)?;
        tracing::debug!("Stored {}/{}", content.channel, content.id);
    }
    Ok(())
}
