//! Exact mode: hierarchical snapshot build and field-by-field verify

use super::test_utils::{sha256_hex, Fixture, FOX, FOX_REFORMATTED, REVENUE};
use semtree::error::ApiError;
use semtree::store::StateFile;
use semtree::tree::snapshot::MerkleSnapshot;
use semtree::verify::SnapshotField;
use std::fs;

#[test]
fn test_single_file_root_is_digest_of_file_digest() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", "a");

    let report = fixture.engine().build_tree(fixture.root()).unwrap();

    assert_eq!(report.root_hash, sha256_hex(sha256_hex(b"a").as_bytes()));
    assert_eq!(report.leaf_count, 1);
    assert_eq!(report.node_count, 2);
}

#[test]
fn test_verify_without_build_is_missing_baseline() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);

    let result = fixture.engine().verify_tree(fixture.root());

    assert!(matches!(result, Err(ApiError::MissingBaseline(_))));
    assert!(!fixture.tree_path().exists());
}

#[test]
fn test_untouched_folder_is_intact() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    fixture.write("sub/inner.txt", REVENUE);
    let engine = fixture.engine();
    engine.build_tree(fixture.root()).unwrap();

    let report = engine.verify_tree(fixture.root()).unwrap();

    assert!(report.is_intact());
    assert!(report.appeared.is_empty());
    assert!(report.disappeared.is_empty());
    assert_eq!(report.previous_root_hash, report.root_hash);
}

#[test]
fn test_content_rewrite_flags_every_field() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    engine.build_tree(fixture.root()).unwrap();

    fixture.write("doc.txt", REVENUE);
    let report = engine.verify_tree(fixture.root()).unwrap();

    assert!(!report.is_intact());
    assert_eq!(
        report.mismatches,
        vec![
            SnapshotField::RootHash,
            SnapshotField::Nodes,
            SnapshotField::Leaves,
            SnapshotField::Hierarchy,
        ]
    );
    assert!(report.appeared.contains(&fixture.key("doc.txt")));
    assert!(report.disappeared.contains(&fixture.key("doc.txt")));
}

/// Same meaning, different bytes: exact mode still sees the change.
#[test]
fn test_reformatting_is_a_mismatch() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    engine.build_tree(fixture.root()).unwrap();

    fixture.write("doc.txt", FOX_REFORMATTED);
    let report = engine.verify_tree(fixture.root()).unwrap();

    assert!(report.mismatches.contains(&SnapshotField::RootHash));
}

#[test]
fn test_verify_rebaselines() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    engine.build_tree(fixture.root()).unwrap();

    fixture.write("doc.txt", REVENUE);
    assert!(!engine.verify_tree(fixture.root()).unwrap().is_intact());
    // The previous verify overwrote the baseline with the changed tree.
    assert!(engine.verify_tree(fixture.root()).unwrap().is_intact());

    let stored: MerkleSnapshot = StateFile::new(fixture.tree_path()).load().unwrap().unwrap();
    let expected_root = sha256_hex(sha256_hex(REVENUE.as_bytes()).as_bytes());
    assert_eq!(stored.root_hash, expected_root);
}

/// Emptying a subdirectory looks exactly like deleting it.
#[test]
fn test_emptied_subdirectory_matches_deleted_subdirectory() {
    let emptied = Fixture::new();
    emptied.write("top.txt", FOX);
    emptied.write("sub/only.txt", REVENUE);
    let engine = emptied.engine();
    let built = engine.build_tree(emptied.root()).unwrap();

    fs::remove_file(emptied.path("sub/only.txt")).unwrap();
    let report = engine.verify_tree(emptied.root()).unwrap();

    assert!(report.mismatches.contains(&SnapshotField::RootHash));
    assert_ne!(report.root_hash, built.root_hash);

    let deleted = Fixture::new();
    deleted.write("top.txt", FOX);
    let deleted_root = deleted.engine().build_tree(deleted.root()).unwrap().root_hash;

    assert_eq!(report.root_hash, deleted_root);
    assert_eq!(
        report.root_hash,
        sha256_hex(sha256_hex(FOX.as_bytes()).as_bytes())
    );
}

#[test]
fn test_exact_and_semantic_baselines_are_independent() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();

    engine.build_tree(fixture.root()).unwrap();
    assert!(fixture.tree_path().exists());
    assert!(!fixture.index_path().exists());
    assert!(matches!(
        engine.verify_flat(fixture.root()),
        Err(ApiError::MissingBaseline(_))
    ));
}
