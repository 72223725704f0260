//! Configuration for vmstore
//!
//! Centralized configuration with sensible defaults.

/// Main configuration shared by readers and writers
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Capacity (in bytes) of the buffered writers for the index and block files
    pub write_buffer_size: usize,

    /// fsync both files when a writer session closes
    pub sync_on_close: bool,

    // -------------------------------------------------------------------------
    // Reader Configuration
    // -------------------------------------------------------------------------
    /// What a reader does with index entries that point past the block file
    pub bounds_policy: BoundsPolicy,
}

/// Handling of index entries whose range exceeds the mapped block file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Treat such entries as absent (logged once at load time)
    Exclude,

    /// Report them as `RangeOutOfBounds`, and refuse to load a store whose
    /// block file cannot be mapped
    Strict,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write_buffer_size: 64 * 1024, // 64 KB
            sync_on_close: true,
            bounds_policy: BoundsPolicy::Exclude,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the buffered writer capacity (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// Set whether files are fsynced on close
    pub fn sync_on_close(mut self, sync: bool) -> Self {
        self.config.sync_on_close = sync;
        self
    }

    /// Set the out-of-bounds entry policy
    pub fn bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.config.bounds_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
