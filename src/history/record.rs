//! History record layout

use bytemuck::{Pod, Zeroable};

/// One play event (or a per-user summary) as stored in the block file
///
/// 40 bytes, laid out as `u64 pid, i32 label, 4 bytes padding, u64 time,
/// f64 played, f64 length`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct HistoryRecord {
    pub pid: u64,
    pub label: i32,
    _pad: u32,
    pub time: u64,
    pub played: f64,
    pub length: f64,
}

// Compile-time assertion: the block layout must stay at 40 bytes
const _RECORD_SIZE_CHECK: () = assert!(
    std::mem::size_of::<HistoryRecord>() == 40,
    "HistoryRecord must be exactly 40 bytes"
);

impl HistoryRecord {
    /// Label marking a per-user summary record
    pub const SUMMARY_LABEL: i32 = -1;

    pub fn new(pid: u64, label: i32, time: u64, played: f64, length: f64) -> Self {
        Self {
            pid,
            label,
            _pad: 0,
            time,
            played,
            length,
        }
    }

    /// Summary record carrying a user's played/length ratio
    pub fn summary(ratio: f64) -> Self {
        Self::new(0, Self::SUMMARY_LABEL, 0, ratio, 0.0)
    }

    pub fn is_summary(&self) -> bool {
        self.pid == 0 && self.label == Self::SUMMARY_LABEL
    }
}
