//! Tests for IndexEntry and SortedIndex
//!
//! These tests verify:
//! - The 24-byte on-disk entry layout
//! - Load-time sorting of unordered index files
//! - Exact-match binary search, including the reserved key

use vmstore::storage::SortedIndex;
use vmstore::{IndexEntry, VmStoreError};

use tempfile::TempDir;

use super::write_index_file;

// =============================================================================
// Entry Layout Tests
// =============================================================================

#[test]
fn test_entry_encoding_layout() {
    let entry = IndexEntry::new(0x0102_0304_0506_0708, 42, 7);

    let bytes = entry.encode();

    assert_eq!(bytes.len(), 24);
    assert_eq!(&bytes[0..8], &0x0102_0304_0506_0708u64.to_le_bytes());
    assert_eq!(&bytes[8..16], &42u64.to_le_bytes());
    assert_eq!(&bytes[16..20], &7u32.to_le_bytes());
    assert_eq!(&bytes[20..24], &[0u8; 4]);
}

#[test]
fn test_entry_decode_ignores_padding() {
    let mut bytes = IndexEntry::new(9, 100, 3).encode();
    bytes[20..24].copy_from_slice(&[0xFF; 4]);

    let entry = IndexEntry::decode(&bytes);

    assert_eq!(entry, IndexEntry::new(9, 100, 3));
}

#[test]
fn test_entry_end() {
    assert_eq!(IndexEntry::new(1, 10, 5).end(), 15);
    assert_eq!(IndexEntry::new(1, u64::MAX, 5).end(), u64::MAX);
}

// =============================================================================
// SortedIndex Tests
// =============================================================================

#[test]
fn test_from_entries_sorts_by_key() {
    let index = SortedIndex::from_entries(vec![
        IndexEntry::new(30, 0, 1),
        IndexEntry::new(10, 1, 1),
        IndexEntry::new(20, 2, 1),
    ]);

    let keys: Vec<u64> = index.keys().collect();
    assert_eq!(keys, vec![10, 20, 30]);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_find_exact_matches_only() {
    let index = SortedIndex::from_entries(vec![
        IndexEntry::new(10, 0, 2),
        IndexEntry::new(20, 2, 3),
        IndexEntry::new(30, 5, 1),
    ]);

    assert_eq!(index.find(20), Some(&IndexEntry::new(20, 2, 3)));
    assert_eq!(index.find(10), Some(&IndexEntry::new(10, 0, 2)));
    assert_eq!(index.find(30), Some(&IndexEntry::new(30, 5, 1)));

    // Between, below, and above the stored keys
    assert_eq!(index.find(15), None);
    assert_eq!(index.find(5), None);
    assert_eq!(index.find(31), None);
}

#[test]
fn test_find_rejects_reserved_key() {
    let index = SortedIndex::from_entries(vec![IndexEntry::new(0, 0, 1)]);

    assert_eq!(index.find(0), None);
    assert!(!index.contains_key(0));
}

#[test]
fn test_empty_index() {
    let index = SortedIndex::default();

    assert!(index.is_empty());
    assert_eq!(index.find(1), None);
}

#[test]
fn test_load_sorts_unordered_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.index");
    write_index_file(
        &path,
        &[
            IndexEntry::new(7, 0, 2),
            IndexEntry::new(3, 2, 1),
            IndexEntry::new(5, 3, 4),
        ],
    );

    let index = SortedIndex::load(&path).unwrap();

    assert_eq!(
        index.entries(),
        &[
            IndexEntry::new(3, 2, 1),
            IndexEntry::new(5, 3, 4),
            IndexEntry::new(7, 0, 2),
        ]
    );
}

#[test]
fn test_load_ignores_partial_trailing_entry() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.index");
    let mut bytes = IndexEntry::new(1, 0, 1).encode().to_vec();
    bytes.extend_from_slice(&IndexEntry::new(2, 1, 1).encode()[..10]);
    std::fs::write(&path, bytes).unwrap();

    let index = SortedIndex::load(&path).unwrap();

    assert_eq!(index.len(), 1);
    assert!(index.contains_key(1));
    assert!(!index.contains_key(2));
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();

    let result = SortedIndex::load(&temp.path().join("missing.index"));

    assert!(matches!(result, Err(VmStoreError::FileOpen { .. })));
}

#[test]
fn test_lookup_across_many_keys() {
    let entries: Vec<IndexEntry> = (1..=1000u64)
        .rev()
        .map(|k| IndexEntry::new(k * 2, k, 1))
        .collect();
    let index = SortedIndex::from_entries(entries);

    for k in 1..=1000u64 {
        assert_eq!(index.find(k * 2).map(|e| e.offset), Some(k));
        assert_eq!(index.find(k * 2 + 1), None);
    }
}
