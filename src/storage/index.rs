//! Sorted Index
//!
//! In-memory table of index entries, sorted by key for binary search.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::VmStoreError;

use super::{IndexEntry, INVALID_KEY};

/// Ascending-by-key table of `(key, offset, count)` entries
#[derive(Debug, Clone, Default)]
pub struct SortedIndex {
    entries: Vec<IndexEntry>,
}

impl SortedIndex {
    /// Build from entries in any order
    pub fn from_entries(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_unstable_by_key(|e| e.key);
        Self { entries }
    }

    /// Load an index file
    ///
    /// The file is a flat run of 24-byte entries with no ordering guarantee.
    /// A trailing partial entry (a truncated write) is ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| VmStoreError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = Vec::new();
        BufReader::new(file).read_to_end(&mut data)?;

        let chunks = data.chunks_exact(IndexEntry::ENCODED_SIZE);
        let trailing = chunks.remainder().len();
        if trailing > 0 {
            tracing::warn!(
                path = %path.display(),
                trailing_bytes = trailing,
                "ignoring partial entry at end of index file"
            );
        }

        let entries = chunks
            .map(|chunk| {
                let mut buf = [0u8; IndexEntry::ENCODED_SIZE];
                buf.copy_from_slice(chunk);
                IndexEntry::decode(&buf)
            })
            .collect::<Vec<_>>();

        let index = Self::from_entries(entries);
        tracing::debug!(path = %path.display(), entries = index.len(), "loaded index");

        Ok(index)
    }

    /// Entry whose key equals `key` — O(log n)
    ///
    /// The reserved key 0 never matches.
    pub fn find(&self, key: u64) -> Option<&IndexEntry> {
        if key == INVALID_KEY {
            return None;
        }

        // lower bound: first entry with entry.key >= key
        let pos = self.entries.partition_point(|e| e.key < key);
        self.entries.get(pos).filter(|e| e.key == key)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ascending by key
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// All keys, ascending
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|e| e.key)
    }
}
