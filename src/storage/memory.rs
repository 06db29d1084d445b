//! In-memory baseline
//!
//! Keeps contents keyed by their normalised URL. Used for dry runs and for
//! chaining runs in tests, where the delta of one run becomes the baseline
//! of the next.

use crate::record::{Content, ContentStub};
use crate::storage::traits::{Baseline, Storage, StorageResult};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct MemoryBaseline {
    contents: HashMap<String, Content>,
}

impl MemoryBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contents(contents: impl IntoIterator<Item = Content>) -> Self {
        let mut baseline = Self::new();
        for content in contents {
            baseline.contents.insert(content.url.clone(), content);
        }
        baseline
    }

    /// Folds a run's reported contents into the baseline
    pub fn absorb(&mut self, contents: &[Content]) {
        for content in contents {
            self.contents.insert(content.url.clone(), content.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl Baseline for MemoryBaseline {
    fn is_known(&self, stub: &ContentStub) -> StorageResult<bool> {
        Ok(self.contents.contains_key(&stub.url))
    }

    fn prior_version(&self, stub: &ContentStub) -> StorageResult<Option<Content>> {
        Ok(self.contents.get(&stub.url).cloned())
    }
}

impl Storage for MemoryBaseline {
    fn add_content(&mut self, content: &Content) -> StorageResult<()> {
        self.contents.insert(content.url.clone(), content.clone());
        Ok(())
    }

    fn content_count(&self) -> StorageResult<u64> {
        Ok(self.contents.len() as u64)
    }
}
