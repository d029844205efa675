//! Tests for CompactionService
//!
//! These tests verify:
//! - Last-write-wins dedup with original relative order preserved
//! - Source/destination existence preconditions (checked before mutation)
//! - Source deletion after a successful rewrite
//! - Multi-file merge semantics (later files win)
//! - Idempotence on already-deduplicated content

use std::fs;
use std::path::PathBuf;

use segstore::{CompactionService, SegstoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const DELIM: &str = "\\n";

fn setup() -> (TempDir, CompactionService) {
    (TempDir::new().unwrap(), CompactionService::new())
}

// =============================================================================
// Compact Tests
// =============================================================================

#[test]
fn test_compact_keeps_last_occurrence_per_key() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");

    fs::write(
        &source,
        format!("key:value{}key2:value2{}key:value4", DELIM, DELIM),
    )
    .unwrap();

    service.compact(&source, &dest).unwrap();

    let content = fs::read_to_string(&dest).unwrap();
    assert_eq!(content, format!("key2:value2{}key:value4", DELIM));
    assert!(!source.exists());
}

#[test]
fn test_compact_preserves_last_occurrence_order() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");

    fs::write(
        &source,
        format!("a:1{}b:2{}c:3{}a:9{}", DELIM, DELIM, DELIM, DELIM),
    )
    .unwrap();

    service.compact(&source, &dest).unwrap();

    // Survivors ordered by where each key last appeared, not by key
    let content = fs::read_to_string(&dest).unwrap();
    assert_eq!(content, format!("b:2{}c:3{}a:9{}", DELIM, DELIM, DELIM));
}

#[test]
fn test_compact_without_duplicates_is_identity() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");
    let dest2 = temp.path().join("db-test-compacted-again");

    let original = format!("a:1{}b:2{}", DELIM, DELIM);
    fs::write(&source, &original).unwrap();

    service.compact(&source, &dest).unwrap();
    let first_pass = fs::read_to_string(&dest).unwrap();
    assert_eq!(first_pass, original);

    // Compacting the compacted output yields byte-identical content
    service.compact(&dest, &dest2).unwrap();
    assert_eq!(fs::read_to_string(&dest2).unwrap(), first_pass);
}

#[test]
fn test_compact_fails_when_source_missing() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");

    let result = service.compact(&source, &dest);
    assert!(matches!(
        result.unwrap_err(),
        SegstoreError::PreconditionFailed(_)
    ));
    assert!(!dest.exists());
}

#[test]
fn test_compact_fails_when_destination_exists() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");

    let original = format!("key:value{}key:value2{}", DELIM, DELIM);
    fs::write(&source, &original).unwrap();
    fs::write(&dest, "my-content").unwrap();

    let result = service.compact(&source, &dest);
    assert!(matches!(
        result.unwrap_err(),
        SegstoreError::PreconditionFailed(_)
    ));

    // Nothing was touched
    assert_eq!(fs::read_to_string(&source).unwrap(), original);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "my-content");
}

#[test]
fn test_compact_requires_file_names() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    fs::write(&source, "a:1").unwrap();

    assert!(matches!(
        service.compact(&source, &PathBuf::new()).unwrap_err(),
        SegstoreError::Validation(_)
    ));
    assert!(matches!(
        service
            .compact(&PathBuf::new(), &temp.path().join("out"))
            .unwrap_err(),
        SegstoreError::Validation(_)
    ));
}

#[test]
fn test_compact_handles_trailing_delimiter() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-test-compacted");

    fs::write(&source, format!("key:value{}key:value4{}", DELIM, DELIM)).unwrap();

    service.compact(&source, &dest).unwrap();

    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        format!("key:value4{}", DELIM)
    );
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_later_file_wins() {
    let (temp, service) = setup();
    let file_a = temp.path().join("db-a");
    let file_b = temp.path().join("db-b");
    let dest = temp.path().join("db-merged");

    fs::write(&file_a, format!("a:1{}", DELIM)).unwrap();
    fs::write(&file_b, format!("a:2{}", DELIM)).unwrap();

    service
        .compact_and_merge(&[file_a.clone(), file_b.clone()], &dest)
        .unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), format!("a:2{}", DELIM));
    assert!(!file_a.exists());
    assert!(!file_b.exists());
}

#[test]
fn test_merge_preserves_distinct_keys_from_all_files() {
    let (temp, service) = setup();
    let file_a = temp.path().join("db-a");
    let file_b = temp.path().join("db-b");
    let dest = temp.path().join("db-merged");

    fs::write(&file_a, format!("k1:v1{}k2:v2{}", DELIM, DELIM)).unwrap();
    fs::write(&file_b, format!("k3:v3{}k1:v9{}", DELIM, DELIM)).unwrap();

    service
        .compact_and_merge(&[file_a, file_b], &dest)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        format!("k2:v2{}k3:v3{}k1:v9{}", DELIM, DELIM, DELIM)
    );
}

#[test]
fn test_merge_handles_missing_trailing_delimiter() {
    let (temp, service) = setup();
    let file_a = temp.path().join("db-a");
    let file_b = temp.path().join("db-b");
    let dest = temp.path().join("db-merged");

    // file_a has no trailing delimiter; the merge inserts one so the last
    // record of file_a and the first of file_b stay separate
    fs::write(&file_a, "k1:v1").unwrap();
    fs::write(&file_b, format!("k2:v2{}", DELIM)).unwrap();

    service
        .compact_and_merge(&[file_a, file_b], &dest)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        format!("k1:v1{}k2:v2{}", DELIM, DELIM)
    );
}

#[test]
fn test_merge_single_file_behaves_like_compact() {
    let (temp, service) = setup();
    let source = temp.path().join("db-test");
    let dest = temp.path().join("db-merged");

    fs::write(&source, format!("k:1{}k:2{}", DELIM, DELIM)).unwrap();

    service.compact_and_merge(&[source.clone()], &dest).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), format!("k:2{}", DELIM));
    assert!(!source.exists());
}

#[test]
fn test_merge_requires_at_least_one_source() {
    let (temp, service) = setup();
    let dest = temp.path().join("db-merged");

    let result = service.compact_and_merge(&[], &dest);
    assert!(matches!(result.unwrap_err(), SegstoreError::Validation(_)));
}

#[test]
fn test_merge_fails_when_any_source_missing() {
    let (temp, service) = setup();
    let file_a = temp.path().join("db-a");
    let missing = temp.path().join("db-missing");
    let dest = temp.path().join("db-merged");

    fs::write(&file_a, format!("a:1{}", DELIM)).unwrap();

    let result = service.compact_and_merge(&[file_a.clone(), missing], &dest);
    assert!(matches!(
        result.unwrap_err(),
        SegstoreError::PreconditionFailed(_)
    ));

    // The present source was not consumed
    assert!(file_a.exists());
    assert!(!dest.exists());
}

#[test]
fn test_merge_fails_when_destination_exists() {
    let (temp, service) = setup();
    let file_a = temp.path().join("db-a");
    let file_b = temp.path().join("db-b");
    let dest = temp.path().join("db-merged");

    fs::write(&file_a, format!("a:1{}", DELIM)).unwrap();
    fs::write(&file_b, format!("a:2{}", DELIM)).unwrap();
    fs::write(&dest, "my-content").unwrap();

    let result = service.compact_and_merge(&[file_a.clone(), file_b.clone()], &dest);
    assert!(matches!(
        result.unwrap_err(),
        SegstoreError::PreconditionFailed(_)
    ));

    // Sources untouched, destination unchanged
    assert!(file_a.exists());
    assert!(file_b.exists());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "my-content");
}
