//! Compaction Service
//!
//! Offline rewrite of segment files that drops shadowed records.
//!
//! ## Responsibilities
//! - Rewrite one segment file keeping only each key's last occurrence
//! - Merge several segment files into one deduplicated file
//! - Enforce source-exists / destination-absent preconditions before
//!   mutating anything
//!
//! The service holds no state and knows nothing about any live
//! [`SegmentManager`](crate::SegmentManager): it operates purely on the
//! file paths the caller names. Only compact rotated-out segments: running
//! it against a file that is still being written to is undefined.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SegstoreError};
use crate::record::{self, require_path};

/// Stateless compaction entrypoints for operational tooling
#[derive(Debug, Default)]
pub struct CompactionService;

impl CompactionService {
    /// Create a compaction service
    pub fn new() -> Self {
        Self
    }

    /// Rewrite `source` into `dest`, keeping only each key's last record,
    /// then delete `source`
    ///
    /// Preconditions, checked before any file is touched: `source` must
    /// exist and `dest` must not. The source is deleted only after the
    /// destination write succeeds, so a failed run never leaves the data
    /// partially consumed.
    pub fn compact(&self, source: &Path, dest: &Path) -> Result<()> {
        require_path(source, "File name")?;
        require_path(dest, "New file name")?;

        if !source.exists() {
            return Err(SegstoreError::PreconditionFailed(format!(
                "source file {} does not exist",
                source.display()
            )));
        }
        if dest.exists() {
            return Err(SegstoreError::PreconditionFailed(format!(
                "destination file {} already exists",
                dest.display()
            )));
        }

        let content = fs::read_to_string(source)?;
        let (compacted, stats) = dedupe(&content);

        fs::write(dest, &compacted)?;
        fs::remove_file(source)?;

        tracing::info!(
            "Compacted {} into {}: {} records in, {} out, {} bytes reclaimed",
            source.display(),
            dest.display(),
            stats.records_in,
            stats.records_out,
            content.len() - compacted.len()
        );

        Ok(())
    }

    /// Merge `sources` (in the given order) into one deduplicated `dest`,
    /// then delete every source
    ///
    /// Later files win for duplicated keys, matching the manager's
    /// newest-last segment order. Preconditions: a non-empty source list,
    /// every source present, `dest` absent, all checked before any
    /// mutation. Source deletions are not transactional: a failed deletion
    /// is surfaced, but files already removed are not restored.
    pub fn compact_and_merge(&self, sources: &[PathBuf], dest: &Path) -> Result<()> {
        if sources.is_empty() {
            return Err(SegstoreError::Validation(
                "At least one source file".to_string(),
            ));
        }
        require_path(dest, "New file name")?;

        for source in sources {
            require_path(source, "File name")?;
            if !source.exists() {
                return Err(SegstoreError::PreconditionFailed(format!(
                    "source file {} does not exist",
                    source.display()
                )));
            }
        }
        if dest.exists() {
            return Err(SegstoreError::PreconditionFailed(format!(
                "destination file {} already exists",
                dest.display()
            )));
        }

        // Concatenate in caller order, delimiter-separated
        let mut merged = String::new();
        for source in sources {
            let content = fs::read_to_string(source)?;
            if !merged.is_empty() && !merged.ends_with(record::DELIMITER) {
                merged.push_str(record::DELIMITER);
            }
            merged.push_str(&content);
        }

        let (compacted, stats) = dedupe(&merged);

        fs::write(dest, &compacted)?;
        for source in sources {
            fs::remove_file(source)?;
        }

        tracing::info!(
            "Merged {} files into {}: {} records in, {} out, {} bytes reclaimed",
            sources.len(),
            dest.display(),
            stats.records_in,
            stats.records_out,
            merged.len() - compacted.len()
        );

        Ok(())
    }
}

/// Counters surfaced in the per-operation log line
struct DedupeStats {
    records_in: usize,
    records_out: usize,
}

/// Keep only each key's last occurrence
///
/// Scans `content` into records, marks the highest index seen per key, and
/// re-emits the surviving records ordered by the ascending original index
/// of their last occurrence; the output is NOT sorted by key. Each
/// survivor is reconstituted as its original byte range, so a record keeps
/// (or lacks) its trailing delimiter exactly as it appeared in the input.
fn dedupe(content: &str) -> (String, DedupeStats) {
    let records = record::scan(content);

    let mut last_by_key: HashMap<&str, usize> = HashMap::new();
    for (idx, rec) in records.iter().enumerate() {
        last_by_key.insert(record::key_of(rec.body), idx);
    }

    let mut out = String::new();
    let mut records_out = 0;
    for (idx, rec) in records.iter().enumerate() {
        if last_by_key.get(record::key_of(rec.body)) == Some(&idx) {
            let start = rec.offset as usize;
            let end = start + rec.len as usize;
            out.push_str(&content[start..end]);
            records_out += 1;
        }
    }

    (
        out,
        DedupeStats {
            records_in: records.len(),
            records_out,
        },
    )
}
