//! Record encoding and scanning
//!
//! The on-disk wire format shared by segments and compaction.
//!
//! ## Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ key ":" value "\n"                           │  ← "\n" is the literal
//! │ key ":" value "\n"                           │    two-byte sequence
//! │ ...                                          │    backslash + 'n',
//! └──────────────────────────────────────────────┘    NOT a line feed
//! ```
//!
//! No length prefix and no escaping: a key or value containing `:` or the
//! delimiter corrupts parsing. This is a known limitation of the format.

use crate::error::{Result, SegstoreError};

/// Record delimiter: the two-character sequence backslash + 'n'.
pub const DELIMITER: &str = "\\n";

/// Encode a key-value pair into its on-disk representation.
pub fn encode(key: &str, value: &str) -> String {
    format!("{}:{}{}", key, value, DELIMITER)
}

/// Extract the key from an encoded record body (the text before the first
/// `:`). A body without a separator is treated as all key.
pub fn key_of(body: &str) -> &str {
    match body.find(':') {
        Some(pos) => &body[..pos],
        None => body,
    }
}

/// Fail with a `Validation` error when a required argument is empty.
pub fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SegstoreError::Validation(what.to_string()));
    }
    Ok(())
}

/// Path flavor of [`require_non_empty`].
pub fn require_path(path: &std::path::Path, what: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SegstoreError::Validation(what.to_string()));
    }
    Ok(())
}

/// A record located by [`scan`]: the undecorated `key:value` body, the byte
/// offset of the record within the scanned content, and the encoded length
/// (trailing delimiter included when one follows the body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub body: &'a str,
    pub offset: u64,
    pub len: u64,
}

/// Walk `content` in file order, producing one [`RawRecord`] per non-empty
/// fragment between delimiters.
///
/// Offsets come from a single forward accumulation, so a duplicated key's
/// records appear in write order. Empty fragments (a trailing delimiter, or
/// doubled delimiters) yield no record but still advance the offset.
pub fn scan(content: &str) -> Vec<RawRecord<'_>> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    for fragment in content.split(DELIMITER) {
        let end = offset + fragment.len();
        // Every fragment except the last is followed by a delimiter
        let terminated = end < content.len();

        if !fragment.is_empty() {
            let len = fragment.len() + if terminated { DELIMITER.len() } else { 0 };
            records.push(RawRecord {
                body: fragment,
                offset: offset as u64,
                len: len as u64,
            });
        }

        offset = end + if terminated { DELIMITER.len() } else { 0 };
    }

    records
}
