//! # segstore
//!
//! A minimal log-structured key-value store with:
//! - Append-only segment files of delimiter-separated text records
//! - An in-memory key → byte-range index per segment
//! - Capacity-bounded segments sharded by a manager
//! - Offline compaction that reclaims space from overwritten records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │        (request dispatcher, CLI, operational tooling)        │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ store / retrieve                 │ compact / merge
//! ┌──────────▼──────────┐            ┌──────────▼──────────┐
//! │   SegmentManager    │            │  CompactionService  │
//! │ (rollover, fan-out) │            │   (offline, by path)│
//! └──────────┬──────────┘            └──────────┬──────────┘
//!            │ newest → oldest                  │ rewrite + delete
//! ┌──────────▼──────────┐            ┌──────────▼──────────┐
//! │      Segment        │            │    segment files    │
//! │  (file + index)     │──────────▶ │     (on disk)       │
//! └─────────────────────┘   append   └─────────────────────┘
//! ```
//!
//! There is no internal locking: one logical writer per segment, enforced
//! through `&mut self`. Callers serialize access externally and only hand
//! rotated-out files to the compaction service.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod compaction;
pub mod record;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use compaction::CompactionService;
pub use config::Config;
pub use error::{Result, SegstoreError};
pub use storage::{IndexEntry, Segment, SegmentManager};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of segstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
