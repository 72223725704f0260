//! Tests for HistoryRecord
//!
//! These tests verify:
//! - The 40-byte block layout
//! - Summary record markers

use vmstore::history::HistoryRecord;

#[test]
fn test_record_layout() {
    let record = HistoryRecord::new(0x1122, -3, 0x3344, 1.5, 2.5);
    let bytes = bytemuck::bytes_of(&record);

    assert_eq!(bytes.len(), 40);
    assert_eq!(&bytes[0..8], &0x1122u64.to_ne_bytes());
    assert_eq!(&bytes[8..12], &(-3i32).to_ne_bytes());
    assert_eq!(&bytes[12..16], &[0u8; 4]);
    assert_eq!(&bytes[16..24], &0x3344u64.to_ne_bytes());
    assert_eq!(&bytes[24..32], &1.5f64.to_ne_bytes());
    assert_eq!(&bytes[32..40], &2.5f64.to_ne_bytes());
}

#[test]
fn test_summary_record() {
    let summary = HistoryRecord::summary(0.75);

    assert!(summary.is_summary());
    assert_eq!(summary.pid, 0);
    assert_eq!(summary.label, HistoryRecord::SUMMARY_LABEL);
    assert_eq!(summary.time, 0);
    assert_eq!(summary.played, 0.75);
    assert_eq!(summary.length, 0.0);
}

#[test]
fn test_event_is_not_summary() {
    assert!(!HistoryRecord::new(5, 1, 100, 10.0, 20.0).is_summary());
    assert!(!HistoryRecord::new(0, 1, 100, 10.0, 20.0).is_summary());
}
