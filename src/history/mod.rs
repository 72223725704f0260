//! History Module
//!
//! Builds block stores of per-user play history from text logs.
//!
//! ## Input Format
//! One event per line, whitespace separated:
//! ```text
//! uid pid label time [played] [length]
//! ```
//! Lines with fewer than four fields, or fields that do not parse, are
//! skipped and counted.
//!
//! ## Output Layout (per uid, in first-seen order)
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Summary record                               │
//! │   pid=0, label=-1, time=0                    │
//! │   played = Σ played / Σ length, length = 0   │
//! ├──────────────────────────────────────────────┤
//! │ Event records, in input order                │
//! └──────────────────────────────────────────────┘
//! ```

mod loader;
mod record;

pub use loader::{HistoryLoader, LoadStats};
pub use record::HistoryRecord;
