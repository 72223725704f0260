//! Block Store Reader
//!
//! Resolves keys through the sorted index and serves records straight from
//! the memory-mapped block file.

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::config::{BoundsPolicy, Config};
use crate::error::Result;
use crate::mmap::MemoryMapper;
use crate::VmStoreError;

use super::{record_width, IndexEntry, Location, Record, SortedIndex, StorePaths, INVALID_KEY};

/// Per-record callback used by scans
///
/// Returning `false` excludes the record from the processed count without
/// stopping the scan. Implemented for every `FnMut(&T, u32) -> bool`.
pub trait ScanVisitor<T> {
    /// `sequence` is the record's position within the scanned range
    fn visit(&mut self, record: &T, sequence: u32) -> bool;
}

impl<T, F> ScanVisitor<T> for F
where
    F: FnMut(&T, u32) -> bool,
{
    fn visit(&mut self, record: &T, sequence: u32) -> bool {
        self(record, sequence)
    }
}

/// Collects every visited record
struct CopyVisitor<T> {
    out: Vec<T>,
}

impl<T: Record> ScanVisitor<T> for CopyVisitor<T> {
    fn visit(&mut self, record: &T, _sequence: u32) -> bool {
        self.out.push(*record);
        true
    }
}

/// Read-only view over an index/block file pair
///
/// Immutable after [`load`](Self::load): lookups and scans take `&self` and
/// the reader can be shared across threads behind an `Arc`.
pub struct BlockStoreReader<T: Record> {
    /// Index and block file names
    paths: StorePaths,
    /// Entries sorted by key
    index: SortedIndex,
    /// The mapped block file
    mapper: MemoryMapper,
    /// Whole records available in the mapping
    record_count: u64,
    /// Load configuration (kept for reopen)
    config: Config,
    _record: PhantomData<T>,
}

impl<T: Record> BlockStoreReader<T> {
    /// Load a store from its base name or either suffixed file name
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_config(path, Config::default())
    }

    /// Load a store with an explicit configuration
    ///
    /// Fails if the index file cannot be read. An unmappable block file
    /// leaves the reader with zero records under `BoundsPolicy::Exclude`,
    /// and fails the load under `BoundsPolicy::Strict`.
    pub fn load_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let width = record_width::<T>();
        if width == 0 {
            return Err(VmStoreError::RecordWidth(
                "zero-sized record types cannot be stored".to_string(),
            ));
        }

        let paths = StorePaths::derive(path);
        let index = SortedIndex::load(&paths.index)?;

        let mapper = match config.bounds_policy {
            BoundsPolicy::Strict => MemoryMapper::try_open(&paths.block)?,
            BoundsPolicy::Exclude => MemoryMapper::open(&paths.block),
        };

        let reader = Self::assemble(paths, index, mapper, config)?;

        tracing::info!(
            store = %reader.paths.base.display(),
            keys = reader.index.len(),
            records = reader.record_count,
            "loaded block store"
        );

        Ok(reader)
    }

    /// Independent reader over the same files
    ///
    /// The index is copied and the block file is mapped again; dropping
    /// either reader leaves the other intact.
    pub fn reopen(&self) -> Result<Self> {
        let mapper = match self.config.bounds_policy {
            BoundsPolicy::Strict => MemoryMapper::try_open(&self.paths.block)?,
            BoundsPolicy::Exclude => self.mapper.reopen(),
        };
        Self::assemble(
            self.paths.clone(),
            self.index.clone(),
            mapper,
            self.config.clone(),
        )
    }

    fn assemble(
        paths: StorePaths,
        index: SortedIndex,
        mapper: MemoryMapper,
        config: Config,
    ) -> Result<Self> {
        let width = record_width::<T>();
        let size = mapper.size();

        if size % width != 0 {
            tracing::warn!(
                path = %paths.block.display(),
                trailing_bytes = size % width,
                "block file ends with a partial record"
            );
        }
        let record_count = (size / width) as u64;

        let mut excluded = index
            .entries()
            .iter()
            .filter(|e| e.end() > record_count);

        if let Some(first) = excluded.next() {
            if config.bounds_policy == BoundsPolicy::Strict {
                return Err(VmStoreError::RangeOutOfBounds {
                    key: first.key,
                    offset: first.offset,
                    count: first.count,
                    records: record_count,
                });
            }
            tracing::warn!(
                path = %paths.index.display(),
                excluded = excluded.count() + 1,
                records = record_count,
                "index entries point past the end of the block file and will not resolve"
            );
        }

        Ok(Self {
            paths,
            index,
            mapper,
            record_count,
            config,
            _record: PhantomData,
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Resolve a key to its record range, reporting why it failed
    pub fn locate(&self, key: u64) -> Result<Location> {
        if key == INVALID_KEY {
            return Err(VmStoreError::InvalidKey(key));
        }

        let entry = self.index.find(key).ok_or(VmStoreError::KeyNotFound)?;

        if entry.end() > self.record_count {
            return Err(VmStoreError::RangeOutOfBounds {
                key,
                offset: entry.offset,
                count: entry.count,
                records: self.record_count,
            });
        }

        Ok(entry.location())
    }

    /// Resolve a key to its record range — O(log n)
    ///
    /// `None` for key 0, unknown keys, and entries past the block file.
    pub fn get_location(&self, key: u64) -> Option<Location> {
        match self.locate(key) {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::trace!(key, error = %e, "lookup failed");
                None
            }
        }
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get_location(key).is_some()
    }

    // =========================================================================
    // Scans
    // =========================================================================

    /// Visit the records of `key`; returns how many the visitor accepted
    pub fn scan<V>(&self, key: u64, visitor: &mut V) -> u32
    where
        V: ScanVisitor<T> + ?Sized,
    {
        match self.get_location(key) {
            Some(location) => self.scan_range(location.offset, location.count, visitor),
            None => 0,
        }
    }

    /// Visit records `[offset, offset + count)`; returns how many the visitor
    /// accepted
    ///
    /// An out-of-range request or a panicking visitor yields 0.
    pub fn scan_range<V>(&self, offset: u64, count: u32, visitor: &mut V) -> u32
    where
        V: ScanVisitor<T> + ?Sized,
    {
        let Some(run) = self.slice(offset, count) else {
            tracing::debug!(offset, count, records = self.record_count, "scan out of range");
            return 0;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut accepted = 0u32;
            for (sequence, record) in run.iter().enumerate() {
                if visitor.visit(record, sequence as u32) {
                    accepted += 1;
                }
            }
            accepted
        }));

        match result {
            Ok(accepted) => accepted,
            Err(_) => {
                tracing::error!(offset, count, "scan visitor panicked");
                0
            }
        }
    }

    // =========================================================================
    // Record Access
    // =========================================================================

    /// Copy all records of `key`
    ///
    /// `None` if the key does not resolve or nothing was copied.
    pub fn get(&self, key: u64) -> Option<Vec<T>> {
        let location = self.get_location(key)?;

        let mut copier = CopyVisitor {
            out: Vec::with_capacity(location.count as usize),
        };
        if self.scan_range(location.offset, location.count, &mut copier) == 0 {
            return None;
        }

        Some(copier.out)
    }

    /// Copy the `index`-th record of `key` without scanning the run
    pub fn get_one(&self, key: u64, index: u32) -> Option<T> {
        let location = self.get_location(key)?;
        if index >= location.count {
            return None;
        }

        let position = usize::try_from(location.offset + index as u64).ok()?;
        self.view().get(position).copied()
    }

    /// Borrow the records of `key` directly from the mapping (zero-copy)
    pub fn records(&self, key: u64) -> Option<&[T]> {
        let location = self.get_location(key)?;
        self.slice(location.offset, location.count)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of loaded index entries
    pub fn index_size(&self) -> usize {
        self.index.len()
    }

    /// Number of whole records in the mapped block file
    pub fn block_size(&self) -> u64 {
        self.record_count
    }

    /// Index entries, ascending by key
    pub fn entries(&self) -> &[IndexEntry] {
        self.index.entries()
    }

    /// Keys, ascending
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.index.keys()
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Whether the block file was mapped successfully
    pub fn is_mapped(&self) -> bool {
        self.mapper.is_valid()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// The whole block file as a typed slice
    fn view(&self) -> &[T] {
        if self.record_count == 0 {
            return &[];
        }

        let bytes = &self.mapper.data()[..self.record_count as usize * record_width::<T>()];
        match bytemuck::try_cast_slice(bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = ?e, "block file mapping is not aligned for the record type");
                &[]
            }
        }
    }

    /// Bounds-checked sub-slice `[offset, offset + count)`
    fn slice(&self, offset: u64, count: u32) -> Option<&[T]> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(count as usize)?;
        self.view().get(start..end)
    }
}
