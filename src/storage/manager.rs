//! Segment Manager
//!
//! Owns an ordered sequence of capacity-bounded segments.
//!
//! ## Responsibilities
//! - Create segments lazily as writes arrive
//! - Roll over to a fresh segment when the current one fills up
//! - Search segments newest → oldest for reads
//! - Register compacted segment files produced out-of-band

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, SegstoreError};
use crate::record::require_non_empty;

use super::Segment;

/// Manages the segment sequence
///
/// Segments are kept in creation order; the list only grows. Compaction
/// never touches it; compacted files re-enter through
/// [`register_segment_file`](Self::register_segment_file).
#[derive(Debug)]
pub struct SegmentManager {
    /// Common path prefix for every segment file this manager creates
    prefix: String,

    /// Capacity applied to every created segment
    segment_capacity: u64,

    /// Segments in creation order (last = most recent)
    segments: Vec<Segment>,
}

impl SegmentManager {
    /// Create a manager with an explicit file prefix and per-segment capacity
    ///
    /// No segment exists until the first store.
    pub fn new(prefix: impl Into<String>, segment_capacity: u64) -> Result<Self> {
        let prefix = prefix.into();
        require_non_empty(&prefix, "Prefix")?;

        Ok(Self {
            prefix,
            segment_capacity,
            segments: Vec::new(),
        })
    }

    /// Create a manager from a [`Config`]
    ///
    /// Creates the data directory if it doesn't exist and derives the
    /// segment prefix as `{data_dir}/{segment_prefix}`.
    pub fn with_config(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let prefix = config.data_dir.join(&config.segment_prefix);
        Self::new(prefix.to_string_lossy().into_owned(), config.segment_capacity)
    }

    /// Store a key-value pair in the most recent segment
    ///
    /// On `CapacityExceeded`, creates exactly one new segment and retries;
    /// a second `CapacityExceeded` means the record alone exceeds the
    /// per-segment capacity and propagates to the caller. Bounded loop,
    /// never more than one rollover per store.
    pub fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let mut rolled_over = false;

        loop {
            match self.recent_segment()?.store(key, value) {
                Ok(()) => return Ok(()),
                Err(e @ SegstoreError::CapacityExceeded { .. }) => {
                    if rolled_over {
                        return Err(e);
                    }
                    rolled_over = true;
                    self.add_segment()?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Retrieve the most recent record for `key` across all segments
    ///
    /// Searches segments newest → oldest; the first hit answers the read,
    /// so the latest write wins globally. Returns `Ok(None)`, not an
    /// error, when no segment contains the key, including when zero
    /// segments exist.
    pub fn retrieve(&self, key: &str) -> Result<Option<String>> {
        require_non_empty(key, "Key")?;

        // Search segments newest → oldest
        for segment in self.segments.iter().rev() {
            match segment.retrieve(key) {
                Ok(content) => return Ok(Some(content)),
                Err(SegstoreError::KeyNotFound) => continue, // Try an older segment
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Adopt an existing segment file (typically compaction output)
    ///
    /// Rebuilds the index from the file's content and appends the segment
    /// to the list as the most recent one. The caller is responsible for
    /// only registering files whose keys are not shadowed by newer live
    /// segments.
    pub fn register_segment_file(&mut self, file: &Path) -> Result<()> {
        let mut segment = Segment::new(file, self.segment_capacity)?;
        segment.reconstruct_from_file(file)?;

        tracing::debug!(
            "Registered segment {} ({} keys)",
            file.display(),
            segment.key_count()
        );

        self.segments.push(segment);
        Ok(())
    }

    // =========================================================================
    // Accessors (for callers and tests)
    // =========================================================================

    /// The common file prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Capacity applied to every created segment
    pub fn segment_capacity(&self) -> u64 {
        self.segment_capacity
    }

    /// Number of live segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Paths of all segment files, oldest first
    ///
    /// Operational callers hand rotated-out paths to the compaction
    /// service.
    pub fn segment_paths(&self) -> Vec<&Path> {
        self.segments.iter().map(|s| s.path()).collect()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// The most recent segment, creating the first one lazily
    fn recent_segment(&mut self) -> Result<&mut Segment> {
        if self.segments.is_empty() {
            self.add_segment()?;
        }

        let last = self.segments.len() - 1;
        Ok(&mut self.segments[last])
    }

    /// Append a fresh segment to the sequence
    fn add_segment(&mut self) -> Result<()> {
        let path = self.generate_file_name();
        tracing::debug!("Creating segment {}", path.display());

        self.segments
            .push(Segment::new(path, self.segment_capacity)?);
        Ok(())
    }

    /// Prefix plus a freshly generated unique suffix, collision-free for
    /// concurrently created managers sharing a prefix
    fn generate_file_name(&self) -> PathBuf {
        PathBuf::from(format!("{}-{}", self.prefix, Uuid::new_v4()))
    }
}
