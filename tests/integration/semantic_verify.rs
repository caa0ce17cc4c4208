//! Semantic mode: flat fold plus embedding classification, end to end

use super::test_utils::{sha256_hex, Fixture, FOX, FOX_REFORMATTED, REVENUE};
use semtree::error::ApiError;
use semtree::semantic::Classification;
use semtree::store::{FlatIndex, StateFile};
use semtree::tree::hasher::HashAlgorithm;
use semtree::tree::merkle;
use std::fs;

fn load_index(fixture: &Fixture) -> FlatIndex {
    StateFile::<FlatIndex>::new(fixture.index_path())
        .load()
        .unwrap()
        .unwrap()
}

#[test]
fn test_single_file_root_is_file_digest() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", "a");

    let report = fixture.engine().build_flat(fixture.root()).unwrap();

    assert_eq!(report.file_count, 1);
    assert_eq!(report.root_hash, sha256_hex(b"a"));
}

#[test]
fn test_build_persists_every_file_in_path_order() {
    let fixture = Fixture::new();
    fixture.write("b.txt", "bravo");
    fixture.write("a.txt", "alpha");
    fixture.write("sub/c.txt", "charlie");

    let report = fixture.engine().build_flat(fixture.root()).unwrap();
    let index = load_index(&fixture);

    assert_eq!(index.len(), 3);
    assert_eq!(index.root_hash, report.root_hash);
    let expected = merkle::fold(
        HashAlgorithm::Sha256,
        &[sha256_hex(b"alpha"), sha256_hex(b"bravo"), sha256_hex(b"charlie")],
    );
    assert_eq!(report.root_hash, expected);
    assert_eq!(index.get(&fixture.key("a.txt")).unwrap().embedding.len(), 384);
}

#[test]
fn test_verify_without_build_is_missing_baseline() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);

    let result = fixture.engine().verify_flat(fixture.root());

    assert!(matches!(result, Err(ApiError::MissingBaseline(_))));
    assert!(!fixture.index_path().exists());
}

#[test]
fn test_verify_with_empty_index_is_missing_baseline() {
    let fixture = Fixture::new();
    StateFile::new(fixture.index_path())
        .save(&FlatIndex::new())
        .unwrap();

    let result = fixture.engine().verify_flat(fixture.root());
    assert!(matches!(result, Err(ApiError::MissingBaseline(_))));
}

#[test]
fn test_missing_folder_is_rejected() {
    let fixture = Fixture::new();
    let missing = fixture.path("nope");

    let result = fixture.engine().build_flat(&missing);
    assert!(matches!(result, Err(ApiError::FolderNotFound(_))));
}

#[test]
fn test_untouched_folder_verifies_unchanged() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    let built = engine.build_flat(fixture.root()).unwrap();

    let report = engine.verify_flat(fixture.root()).unwrap();

    assert!(!report.has_changes());
    assert_eq!(report.previous_root_hash, built.root_hash);
    assert_eq!(report.root_hash, built.root_hash);
    assert_eq!(report.files[0].classification, Classification::Unchanged);
    assert!(report.files[0].similarity.unwrap() > 0.999);
}

/// Unrelated prose drops below the threshold and replaces the record.
#[test]
fn test_unrelated_rewrite_is_semantic_change() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    engine.build_flat(fixture.root()).unwrap();

    fixture.write("doc.txt", REVENUE);
    let report = engine.verify_flat(fixture.root()).unwrap();

    let key = fixture.key("doc.txt");
    assert_eq!(report.changed_paths(), vec![key.as_str()]);
    assert_eq!(report.files[0].classification, Classification::SemanticChange);
    assert!(report.files[0].similarity.unwrap() < 0.70);

    let index = load_index(&fixture);
    assert_eq!(index.get(&key).unwrap().digest, sha256_hex(REVENUE.as_bytes()));
    assert_eq!(index.root_hash, sha256_hex(REVENUE.as_bytes()));
}

/// A reformatting keeps the meaning: unchanged, stale record, moving root.
#[test]
fn test_reformatting_is_unchanged_and_leaves_record_stale() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let engine = fixture.engine();
    let built = engine.build_flat(fixture.root()).unwrap();

    fixture.write("doc.txt", FOX_REFORMATTED);
    let report = engine.verify_flat(fixture.root()).unwrap();

    assert!(!report.has_changes());
    assert_eq!(report.files[0].classification, Classification::Unchanged);

    let index = load_index(&fixture);
    let record = index.get(&fixture.key("doc.txt")).unwrap();
    assert_eq!(record.digest, sha256_hex(FOX.as_bytes()));

    // The root follows the bytes on disk even though the record did not move.
    assert_eq!(report.root_hash, sha256_hex(FOX_REFORMATTED.as_bytes()));
    assert_ne!(report.root_hash, built.root_hash);
    assert_eq!(index.root_hash, report.root_hash);
}

#[test]
fn test_new_file_is_reported_and_recorded() {
    let fixture = Fixture::new();
    fixture.write("a.txt", FOX);
    let engine = fixture.engine();
    engine.build_flat(fixture.root()).unwrap();

    fixture.write("b.txt", REVENUE);
    let report = engine.verify_flat(fixture.root()).unwrap();

    let new_key = fixture.key("b.txt");
    assert_eq!(report.changed_paths(), vec![new_key.as_str()]);
    let verdict = report.files.iter().find(|f| f.path == new_key).unwrap();
    assert_eq!(verdict.classification, Classification::NewFile);
    assert_eq!(verdict.similarity, None);
    assert_eq!(load_index(&fixture).len(), 2);
}

#[test]
fn test_deleted_file_is_missing_but_kept() {
    let fixture = Fixture::new();
    fixture.write("a.txt", FOX);
    fixture.write("b.txt", REVENUE);
    let engine = fixture.engine();
    engine.build_flat(fixture.root()).unwrap();

    fs::remove_file(fixture.path("b.txt")).unwrap();
    let report = engine.verify_flat(fixture.root()).unwrap();

    assert_eq!(report.missing, vec![fixture.key("b.txt")]);
    assert_eq!(report.root_hash, sha256_hex(FOX.as_bytes()));
    assert!(load_index(&fixture).get(&fixture.key("b.txt")).is_some());
}

#[test]
fn test_strict_threshold_is_configurable() {
    let fixture = Fixture::new();
    fixture.write("doc.txt", FOX);
    let mut config = fixture.config();
    // Above any achievable similarity: every known file drifts
    config.semantic.threshold = 1.0 + 1e-9;
    let engine = semtree::verify::IntegrityEngine::from_config(config).unwrap();
    engine.build_flat(fixture.root()).unwrap();

    let report = engine.verify_flat(fixture.root()).unwrap();
    assert_eq!(report.files[0].classification, Classification::SemanticChange);
}

#[test]
fn test_latin1_file_is_decoded_not_skipped() {
    let fixture = Fixture::new();
    fs::write(fixture.path("latin1.txt"), [0x63, 0x61, 0x66, 0xe9]).unwrap();

    let report = fixture.engine().build_flat(fixture.root()).unwrap();

    assert_eq!(report.file_count, 1);
    assert!(report.skipped.is_empty());
    assert_eq!(report.root_hash, sha256_hex(&[0x63, 0x61, 0x66, 0xe9]));
}
