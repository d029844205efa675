//! Segment
//!
//! One append-only file plus the in-memory index that maps each key to the
//! byte range of its most recent record.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SegstoreError};
use crate::record::{self, require_non_empty, require_path};

/// Index entry: where an encoded record lives inside the segment file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Byte position of the record within the file
    pub offset: u64,
    /// Byte length of the encoded record
    pub size: u64,
}

/// An append-only segment
///
/// The backing file grows monotonically; it is never truncated or rewritten
/// in place. Overwriting a key appends a new record and repoints the index;
/// the old bytes stay on disk as garbage until compaction.
#[derive(Debug)]
pub struct Segment {
    /// Path of the backing file (created lazily on first store)
    path: PathBuf,
    /// Hard ceiling on accumulated record bytes
    max_capacity: u64,
    /// Bytes accumulated so far (previously written records)
    current_space: u64,
    /// key → byte range of the key's latest record
    index: HashMap<String, IndexEntry>,
}

impl Segment {
    /// Create a fresh segment backed by `path`
    ///
    /// Performs no I/O; the file appears on the first successful store.
    pub fn new(path: impl Into<PathBuf>, max_capacity: u64) -> Result<Self> {
        let path = path.into();
        require_path(&path, "File name")?;

        Ok(Self {
            path,
            max_capacity,
            current_space: 0,
            index: HashMap::new(),
        })
    }

    /// Append a record for `key`
    ///
    /// Fails with `CapacityExceeded`, before any I/O or index mutation,
    /// when the encoded record would push the accumulated space past the
    /// segment's capacity. Otherwise appends the encoded bytes, records
    /// `{offset = file length before the append, size = encoded length}`
    /// under `key` (replacing any prior entry), and grows `current_space`.
    pub fn store(&mut self, key: &str, value: &str) -> Result<()> {
        require_non_empty(key, "Key")?;
        require_non_empty(value, "Value")?;

        let encoded = record::encode(key, value);
        let encoded_len = encoded.len() as u64;

        if self.current_space + encoded_len > self.max_capacity {
            return Err(SegstoreError::CapacityExceeded {
                needed: self.current_space + encoded_len,
                capacity: self.max_capacity,
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let offset = file.metadata()?.len();
        file.write_all(encoded.as_bytes())?;

        self.index.insert(
            key.to_string(),
            IndexEntry {
                offset,
                size: encoded_len,
            },
        );
        self.current_space += encoded_len;

        Ok(())
    }

    /// Read back the record stored under `key`
    ///
    /// Fails with `KeyNotFound` when the key is absent from the index.
    /// Returns the FULL encoded record: `key:` prefix and trailing
    /// delimiter included, not the bare value. This is a deliberate
    /// wire-compatibility quirk; callers strip the decoration themselves.
    pub fn retrieve(&self, key: &str) -> Result<String> {
        require_non_empty(key, "Key")?;

        let entry = self.index.get(key).ok_or(SegstoreError::KeyNotFound)?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset))?;

        let mut buf = vec![0u8; entry.size as usize];
        file.read_exact(&mut buf)?;

        String::from_utf8(buf).map_err(|e| {
            SegstoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Rebuild this segment's state from an existing file
    ///
    /// Only valid while the index is empty. Scans `file` in a single
    /// forward pass, so a duplicated key ends up indexed at its last
    /// occurrence, the same last-write-wins outcome live stores produce.
    /// The segment adopts `file` as its backing file and counts the file's
    /// full byte length as occupied space.
    pub fn reconstruct_from_file(&mut self, file: &Path) -> Result<()> {
        require_path(file, "File name")?;

        if !self.index.is_empty() {
            return Err(SegstoreError::PreconditionFailed(format!(
                "cannot reconstruct {}: segment index is not empty",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(file)?;

        for rec in record::scan(&content) {
            self.index.insert(
                record::key_of(rec.body).to_string(),
                IndexEntry {
                    offset: rec.offset,
                    size: rec.len,
                },
            );
        }

        self.path = file.to_path_buf();
        self.current_space = content.len() as u64;

        tracing::debug!(
            "Reconstructed segment {} ({} keys, {} bytes)",
            self.path.display(),
            self.index.len(),
            self.current_space
        );

        Ok(())
    }

    // =========================================================================
    // Accessors (for callers and tests)
    // =========================================================================

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Capacity ceiling in bytes
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// Bytes accumulated so far
    pub fn current_space(&self) -> u64 {
        self.current_space
    }

    /// Number of distinct keys in the index
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Look up the indexed byte range for `key`
    pub fn index_entry(&self, key: &str) -> Option<IndexEntry> {
        self.index.get(key).copied()
    }
}
