//! Block Store Writer
//!
//! Writes records grouped by key to a new index/block file pair.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::VmStoreError;

use super::{record_width, IndexEntry, Record, StorePaths, INVALID_KEY};

/// Totals of a closed writer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    /// Index entries written
    pub keys: u64,
    /// Records written to the block file
    pub records: u64,
}

/// Sequential writer for one store
///
/// Protocol: `switch_index(key)`, then one or more `write(record)`, repeated
/// per key. The index entry of a key is written once its record count is
/// known: on the next `switch_index`, an explicit `flush_index`, or `close`.
///
/// Dropping an unclosed writer flushes and closes both files.
pub struct BlockStoreWriter<T: Record> {
    /// Index and block file names
    paths: StorePaths,
    /// Buffered block file (None once closed)
    block: Option<BufWriter<File>>,
    /// Buffered index file (None once closed)
    index: Option<BufWriter<File>>,
    /// Keys already opened in this session
    seen: HashSet<u64>,
    /// Entry of the active key, not yet persisted
    pending: Option<IndexEntry>,
    /// Records written so far (start of the next run)
    position: u64,
    /// Index entries persisted so far
    entries_written: u64,
    /// fsync on close
    sync_on_close: bool,
    closed: bool,
    _record: PhantomData<T>,
}

impl<T: Record> BlockStoreWriter<T> {
    /// Create (or truncate) the store files for a base name or either suffixed
    /// file name
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_config(path, &Config::default())
    }

    /// Create the store files with an explicit configuration
    pub fn create_with_config(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        if record_width::<T>() == 0 {
            return Err(VmStoreError::RecordWidth(
                "zero-sized record types cannot be stored".to_string(),
            ));
        }

        let paths = StorePaths::derive(path);

        let block = Self::open_truncated(&paths.block, config.write_buffer_size)?;
        let index = Self::open_truncated(&paths.index, config.write_buffer_size)?;

        tracing::debug!(store = %paths.base.display(), "opened writer session");

        Ok(Self {
            paths,
            block: Some(block),
            index: Some(index),
            seen: HashSet::new(),
            pending: None,
            position: 0,
            entries_written: 0,
            sync_on_close: config.sync_on_close,
            closed: false,
            _record: PhantomData,
        })
    }

    /// Start the record group of `key`
    ///
    /// Flushes the previous key's entry. Each key may be opened once per
    /// session; a repeat fails with `DuplicateKey` and changes nothing.
    pub fn switch_index(&mut self, key: u64) -> Result<()> {
        if key == INVALID_KEY {
            return Err(VmStoreError::InvalidKey(key));
        }
        if self.seen.contains(&key) {
            return Err(VmStoreError::DuplicateKey(key));
        }

        self.flush_index()?;

        self.seen.insert(key);
        self.pending = Some(IndexEntry::new(key, self.position, 0));
        tracing::trace!(key, offset = self.position, "switched key");

        Ok(())
    }

    /// Append a record to the active key
    pub fn write(&mut self, record: &T) -> Result<()> {
        let entry = self.pending.as_mut().ok_or(VmStoreError::NoActiveKey)?;
        let count = entry
            .count
            .checked_add(1)
            .ok_or(VmStoreError::GroupTooLarge(entry.key))?;

        let block = self.block.as_mut().ok_or(VmStoreError::NoActiveKey)?;
        block.write_all(bytemuck::bytes_of(record))?;

        entry.count = count;
        self.position += 1;

        Ok(())
    }

    /// Append a record and persist the active key's entry right away
    ///
    /// Later writes need a new `switch_index`.
    pub fn write_and_flush(&mut self, record: &T) -> Result<()> {
        self.write(record)?;
        self.flush_index()
    }

    /// Persist the active key's entry
    ///
    /// No-op when there is nothing pending, so repeated calls write the entry
    /// once.
    pub fn flush_index(&mut self) -> Result<()> {
        let Some(entry) = self.pending.take() else {
            return Ok(());
        };

        let index = self.index.as_mut().ok_or(VmStoreError::NoActiveKey)?;
        index.write_all(&entry.encode())?;
        self.entries_written += 1;

        tracing::trace!(
            key = entry.key,
            offset = entry.offset,
            count = entry.count,
            "flushed index entry"
        );
        Ok(())
    }

    /// Flush the pending entry and close both files
    pub fn close(mut self) -> Result<StoreSummary> {
        self.finish()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Records written so far
    pub fn records_written(&self) -> u64 {
        self.position
    }

    /// Keys opened so far
    pub fn key_count(&self) -> usize {
        self.seen.len()
    }

    /// The key currently accepting records
    pub fn current_key(&self) -> Option<u64> {
        self.pending.map(|e| e.key)
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn summary(&self) -> StoreSummary {
        StoreSummary {
            keys: self.entries_written,
            records: self.position,
        }
    }

    fn open_truncated(path: &Path, capacity: usize) -> Result<BufWriter<File>> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| VmStoreError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(BufWriter::with_capacity(capacity, file))
    }

    /// Runs once; later calls return the same totals
    fn finish(&mut self) -> Result<StoreSummary> {
        if self.closed {
            return Ok(self.summary());
        }
        self.closed = true;

        self.flush_index()?;
        let summary = self.summary();

        for writer in [self.block.take(), self.index.take()].into_iter().flatten() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            if self.sync_on_close {
                file.sync_all()?;
            }
        }

        tracing::info!(
            store = %self.paths.base.display(),
            keys = summary.keys,
            records = summary.records,
            "closed writer session"
        );

        Ok(summary)
    }
}

impl<T: Record> Drop for BlockStoreWriter<T> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(store = %self.paths.base.display(), error = %e, "failed to close writer");
        }
    }
}
