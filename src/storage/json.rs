//! Flat-file JSON storage
//!
//! One pretty-printed document per content, named after its title. Because
//! the key is the title, a bulletin re-published under the same title lands
//! on the same file; the re-check policy decides which stored titles are
//! fetched again and compared row by row.

use crate::channel::Channel;
use crate::record::{Content, ContentDocument, ContentStub};
use crate::storage::traits::{Baseline, Storage, StorageError, StorageResult};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};

/// Which stored documents are re-fetched and compared instead of skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecheckPolicy {
    /// Master switch; when off every stored document is known
    pub enabled: bool,
    /// Only titles mentioning this year are re-checked
    pub year: i32,
    /// Channels whose stored documents are never re-checked
    pub frozen: Vec<Channel>,
}

impl RecheckPolicy {
    /// Policy for the current local year
    pub fn current_year(enabled: bool, frozen: Vec<Channel>) -> Self {
        Self {
            enabled,
            year: chrono::Local::now().year(),
            frozen,
        }
    }

    /// Never re-check
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            year: 0,
            frozen: Vec::new(),
        }
    }

    /// Returns true if a stored document for `stub` should be compared again
    pub fn wants_recheck(&self, stub: &ContentStub) -> bool {
        self.enabled
            && !self.frozen.contains(&stub.channel)
            && stub.title.contains(&self.year.to_string())
    }
}

/// Flat-file storage backend
pub struct JsonStorage {
    dir: PathBuf,
    policy: RecheckPolicy,
}

impl JsonStorage {
    /// Opens the data directory, creating it if needed
    pub fn new(dir: &Path, policy: RecheckPolicy) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            policy,
        })
    }

    /// Path of the document stored for `title`
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_key(title)))
    }

    fn read_document(&self, path: &Path) -> StorageResult<ContentDocument> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| StorageError::Serialization {
            path: path.display().to_string(),
            source,
        })
    }
}

/// File name for a title; path separators and control characters are replaced
pub fn file_key(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

impl Baseline for JsonStorage {
    fn is_known(&self, stub: &ContentStub) -> StorageResult<bool> {
        let exists = self.path_for(&stub.title).try_exists()?;
        Ok(exists && !self.policy.wants_recheck(stub))
    }

    fn prior_version(&self, stub: &ContentStub) -> StorageResult<Option<Content>> {
        let path = self.path_for(&stub.title);
        if !path.try_exists()? {
            return Ok(None);
        }
        let document = self.read_document(&path)?;
        Ok(Some(document.into_content(stub.channel, stub.id.clone())))
    }
}

impl Storage for JsonStorage {
    fn add_content(&mut self, content: &Content) -> StorageResult<()> {
        let path = self.path_for(&content.title);
        let json = serde_json::to_string_pretty(&content.to_document()).map_err(|source| {
            StorageError::Serialization {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(&path, json)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn content_count(&self) -> StorageResult<u64> {
        let mut count = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
