//! Storage Module
//!
//! Paired index/block files holding fixed-size records grouped by 64-bit keys.
//!
//! ## Responsibilities
//! - Write a block file of records and an index file of key ranges in one pass
//! - Load the index into a sorted table for O(log n) key resolution
//! - Serve scans, bulk copies, and single-record fetches from the mapped block
//!
//! ## File Format
//! ```text
//! <base>.index
//! ┌──────────────────────────────────────────────────────┐
//! │ Entry (24 bytes), one per key, in write order         │
//! │ ┌──────────┬─────────────┬───────────┬─────────────┐ │
//! │ │ Key (8)  │ Offset (8)  │ Count (4) │ Padding (4) │ │
//! │ └──────────┴─────────────┴───────────┴─────────────┘ │
//! │ ... repeated ...                                      │
//! └──────────────────────────────────────────────────────┘
//!
//! <base>.block
//! ┌──────────────────────────────────────────────────────┐
//! │ Record 0 │ Record 1 │ ... │ Record N-1               │
//! │ (size_of::<T>() bytes each, runs grouped by key)      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! `Offset` and `Count` are measured in records, not bytes. Integers are
//! little-endian, which matches the in-memory layout the format was first
//! produced with on x86 hosts.

mod entry;
mod index;
mod reader;
mod writer;

use std::path::{Path, PathBuf};

use bytemuck::Pod;

pub use entry::{IndexEntry, Location};
pub use index::SortedIndex;
pub use reader::{BlockStoreReader, ScanVisitor};
pub use writer::{BlockStoreWriter, StoreSummary};

// =============================================================================
// Shared Constants (used by writer, index, reader)
// =============================================================================

/// Suffix of the index file
pub const INDEX_SUFFIX: &str = ".index";

/// Suffix of the block file
pub const BLOCK_SUFFIX: &str = ".block";

/// Reserved key; never resolvable by a reader
pub const INVALID_KEY: u64 = 0;

// =============================================================================
// Record Types
// =============================================================================

/// A fixed-size, plain-old-data value storable in a block file
///
/// Implemented for every `bytemuck::Pod` type. The on-disk width is
/// `size_of::<Self>()`.
pub trait Record: Pod + Send + Sync {}

impl<T: Pod + Send + Sync> Record for T {}

/// On-disk width of a record type
pub(crate) const fn record_width<T: Record>() -> usize {
    std::mem::size_of::<T>()
}

// =============================================================================
// File Names
// =============================================================================

/// The index/block file pair belonging to one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Base name without suffix
    pub base: PathBuf,
    /// `<base>.index`
    pub index: PathBuf,
    /// `<base>.block`
    pub block: PathBuf,
}

impl StorePaths {
    /// Derive both file names from a base name or either suffixed name
    ///
    /// "data/users.block" → base "data/users"
    /// "data/users.index" → base "data/users"
    /// "data/users"       → base "data/users"
    pub fn derive(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        let trimmed = raw.trim();

        let base = trimmed
            .strip_suffix(BLOCK_SUFFIX)
            .or_else(|| trimmed.strip_suffix(INDEX_SUFFIX))
            .unwrap_or(trimmed)
            .to_string();

        Self {
            index: PathBuf::from(format!("{}{}", base, INDEX_SUFFIX)),
            block: PathBuf::from(format!("{}{}", base, BLOCK_SUFFIX)),
            base: PathBuf::from(base),
        }
    }
}
