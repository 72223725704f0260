//! Memory Mapping Module
//!
//! Read-only, zero-copy view of a whole file.
//!
//! ## Responsibilities
//! - Open a file read-only and map its full length
//! - Degrade to an empty mapping (size 0) when the file cannot be opened,
//!   sized, or mapped, instead of failing the caller
//! - Release the mapping and the file handle exactly once on drop
//!
//! A mapper is deliberately not `Clone`: use [`MemoryMapper::reopen`] for an
//! independent mapping of the same file, or share it behind an `Arc`.

mod mapper;

pub use mapper::MemoryMapper;
