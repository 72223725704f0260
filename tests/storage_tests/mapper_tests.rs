//! Tests for MemoryMapper
//!
//! These tests verify:
//! - Whole-file mapping
//! - Empty (invalid) state on failure
//! - Independent reopen

use vmstore::mmap::MemoryMapper;
use vmstore::VmStoreError;

use tempfile::TempDir;

#[test]
fn test_maps_entire_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.bin");
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    std::fs::write(&path, &content).unwrap();

    let mapper = MemoryMapper::open(&path);

    assert!(mapper.is_valid());
    assert_eq!(mapper.size(), 10_000);
    assert_eq!(mapper.data(), content.as_slice());
    assert_eq!(mapper.path(), path.as_path());
}

#[test]
fn test_missing_file_leaves_empty_mapper() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.bin");

    let mapper = MemoryMapper::open(&path);

    assert!(!mapper.is_valid());
    assert_eq!(mapper.size(), 0);
    assert!(mapper.data().is_empty());
}

#[test]
fn test_try_open_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.bin");

    let result = MemoryMapper::try_open(&path);

    assert!(matches!(result, Err(VmStoreError::FileOpen { .. })));
}

#[test]
fn test_empty_file_is_valid_with_zero_size() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.bin");
    std::fs::write(&path, b"").unwrap();

    let mapper = MemoryMapper::try_open(&path).unwrap();

    assert!(mapper.is_valid());
    assert_eq!(mapper.size(), 0);
    assert!(mapper.data().is_empty());
}

#[test]
fn test_reopen_is_independent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.bin");
    std::fs::write(&path, b"hello mapped world").unwrap();

    let original = MemoryMapper::open(&path);
    let copy = original.reopen();
    drop(original);

    // The copy keeps its own mapping after the original is released
    assert!(copy.is_valid());
    assert_eq!(copy.data(), b"hello mapped world");
}

#[test]
fn test_reopen_of_failed_mapper_stays_empty() {
    let temp = TempDir::new().unwrap();
    let mapper = MemoryMapper::open(temp.path().join("missing.bin"));

    let copy = mapper.reopen();

    assert!(!copy.is_valid());
    assert_eq!(copy.size(), 0);
}

#[test]
fn test_mapping_survives_file_removal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.bin");
    std::fs::write(&path, b"persisted").unwrap();

    let mapper = MemoryMapper::open(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(mapper.data(), b"persisted");
}
