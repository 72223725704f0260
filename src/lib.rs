//! # vmstore
//!
//! A read-mostly, key-indexed store of fixed-size records:
//! - A writer appends records grouped under 64-bit keys to a block file and
//!   emits a parallel index file of `(key, offset, count)` entries
//! - A reader memory-maps the block file for zero-copy access and keeps the
//!   index sorted in memory for O(log n) key resolution
//! - Loaded readers are immutable and safe to share across threads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BlockStoreWriter<T>                       │
//! │        switch_index(key) → write(record)* → close()          │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐                ┌─────────────┐
//!         │ <base>.index│                │ <base>.block│
//!         │ (entries)   │                │ (records)   │
//!         └──────┬──────┘                └──────┬──────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐                ┌─────────────┐
//!         │ SortedIndex │                │MemoryMapper │
//!         │(binary srch)│                │ (read-only) │
//!         └──────┬──────┘                └──────┬──────┘
//!                └──────────────┬───────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BlockStoreReader<T>                       │
//! │        get_location / scan / get / get_one / records         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod mmap;
pub mod storage;
pub mod history;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, VmStoreError};
pub use config::{BoundsPolicy, Config};
pub use storage::{BlockStoreReader, BlockStoreWriter, IndexEntry, Location, Record};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of vmstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
