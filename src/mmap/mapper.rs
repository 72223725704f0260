//! Memory Mapper
//!
//! Maps an entire read-only file into the address space.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::Result;
use crate::VmStoreError;

/// Read-only mapping of a whole file
///
/// The file handle is only held while the mapping is established; the
/// mapping itself keeps the pages reachable until the mapper is dropped.
#[derive(Debug)]
pub struct MemoryMapper {
    /// Path the mapping was requested for
    path: PathBuf,
    /// The mapping (None for an empty file or a failed construction)
    mmap: Option<Mmap>,
    /// Whether open + size probe + map all succeeded
    valid: bool,
}

impl MemoryMapper {
    /// Map `path`, falling back to an empty, invalid mapper on failure
    ///
    /// Failures are logged; callers check [`is_valid`](Self::is_valid) or
    /// [`size`](Self::size) before reading.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(mapper) => mapper,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "memory mapping failed");
                Self::empty(path)
            }
        }
    }

    /// Map `path`, returning the typed error on failure
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| VmStoreError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let len = file
            .metadata()
            .map_err(|source| VmStoreError::Mapping {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        // Zero-length mappings are rejected by mmap(2)
        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the store files are immutable once their writer session
            // closes; nothing truncates or rewrites them while mapped.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|source| VmStoreError::Mapping {
                path: path.to_path_buf(),
                source,
            })?;
            Some(mmap)
        };

        tracing::debug!(path = %path.display(), bytes = len, "mapped file");

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            valid: true,
        })
    }

    /// Independent mapping of the same file
    ///
    /// Dropping either mapper never invalidates the other.
    pub fn reopen(&self) -> Self {
        Self::open(&self.path)
    }

    /// The mapped bytes (empty when the mapping failed or the file is empty)
    pub fn data(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }

    /// Length of the mapped range in bytes
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    /// Whether the mapping was established (an empty file is still valid)
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Path this mapper was built from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            mmap: None,
            valid: false,
        }
    }
}
