//! Error types for vmstore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using VmStoreError
pub type Result<T> = std::result::Result<T, VmStoreError>;

/// Unified error type for vmstore operations
#[derive(Debug, Error)]
pub enum VmStoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} can not be opened: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} map to virtual memory failed: {source}", path.display())]
    Mapping {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Invalid key: {0} is reserved")]
    InvalidKey(u64),

    #[error(
        "Range out of bounds for key {key}: offset {offset} + count {count} exceeds {records} records"
    )]
    RangeOutOfBounds {
        key: u64,
        offset: u64,
        count: u32,
        records: u64,
    },

    // -------------------------------------------------------------------------
    // Writer Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate key: {0} was already written in this session")]
    DuplicateKey(u64),

    #[error("No active key: call switch_index before writing records")]
    NoActiveKey,

    #[error("Key {0} holds more records than an index entry can count")]
    GroupTooLarge(u64),

    // -------------------------------------------------------------------------
    // Record Layout Errors
    // -------------------------------------------------------------------------
    #[error("Record width error: {0}")]
    RecordWidth(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
