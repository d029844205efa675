//! Storage Module
//!
//! Append-only segment storage.
//!
//! ## Responsibilities
//! - Persist records by appending to segment files
//! - Map keys to byte ranges through per-segment in-memory indexes
//! - Shard writes across capacity-bounded segments
//! - Resolve reads newest → oldest across the segment sequence
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ key ":" value "\n"                   │
//! │ key ":" value "\n"                   │
//! │ ... (appended, never rewritten) ...  │
//! └──────────────────────────────────────┘
//! ```
//! `"\n"` is the literal two-byte sequence backslash + 'n'; there is no
//! length prefix and no escaping.

mod manager;
mod segment;

pub use manager::SegmentManager;
pub use segment::{IndexEntry, Segment};
