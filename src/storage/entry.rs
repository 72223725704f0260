//! Index Entry
//!
//! The `(key, offset, count)` triple persisted in the index file.

/// Location of one key's run of records in the block file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexEntry {
    /// The key owning the run
    pub key: u64,
    /// Index of the first record of the run (in records, not bytes)
    pub offset: u64,
    /// Number of consecutive records in the run
    pub count: u32,
}

impl IndexEntry {
    /// Encoded size: Key (8) + Offset (8) + Count (4) + Padding (4) = 24 bytes
    pub const ENCODED_SIZE: usize = 24;

    pub fn new(key: u64, offset: u64, count: u32) -> Self {
        Self { key, offset, count }
    }

    /// One past the last record of the run
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.count as u64)
    }

    /// Range location without the key
    pub fn location(&self) -> Location {
        Location {
            offset: self.offset,
            count: self.count,
        }
    }

    /// Encode to the fixed 24-byte on-disk layout
    pub fn encode(&self) -> [u8; Self::ENCODED_SIZE] {
        let mut buf = [0u8; Self::ENCODED_SIZE];
        buf[0..8].copy_from_slice(&self.key.to_le_bytes());
        buf[8..16].copy_from_slice(&self.offset.to_le_bytes());
        buf[16..20].copy_from_slice(&self.count.to_le_bytes());
        // 20..24 stays zeroed (alignment padding)
        buf
    }

    /// Decode from the on-disk layout; padding bytes are ignored
    pub fn decode(buf: &[u8; Self::ENCODED_SIZE]) -> Self {
        let mut key = [0u8; 8];
        let mut offset = [0u8; 8];
        let mut count = [0u8; 4];
        key.copy_from_slice(&buf[0..8]);
        offset.copy_from_slice(&buf[8..16]);
        count.copy_from_slice(&buf[16..20]);

        Self {
            key: u64::from_le_bytes(key),
            offset: u64::from_le_bytes(offset),
            count: u32::from_le_bytes(count),
        }
    }
}

/// A resolved, bounds-checked record range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: u64,
    pub count: u32,
}

impl Location {
    pub fn new(offset: u64, count: u32) -> Self {
        Self { offset, count }
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.count as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
