//! Configuration for segstore
//!
//! Centralized configuration with sensible defaults.
//!
//! File paths stay explicit parameters on every storage operation; `Config`
//! only bundles the values a [`SegmentManager`](crate::SegmentManager)
//! needs at construction time.

use std::path::PathBuf;

/// Default per-segment capacity in bytes
pub const DEFAULT_SEGMENT_CAPACITY: u64 = 100;

/// Main configuration for a segstore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for segment files
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {segment_prefix}-{uuid}   (one file per segment)
    pub data_dir: PathBuf,

    /// File-name prefix shared by every segment this instance creates
    pub segment_prefix: String,

    /// Max accumulated record bytes per segment before rollover
    pub segment_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./segstore_data"),
            segment_prefix: "segment".to_string(),
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
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
    /// Set the data directory (root for all segment files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the segment file-name prefix
    pub fn segment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.segment_prefix = prefix.into();
        self
    }

    /// Set the per-segment capacity (in bytes)
    pub fn segment_capacity(mut self, bytes: u64) -> Self {
        self.config.segment_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
