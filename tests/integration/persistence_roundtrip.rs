//! Persisted state schemas survive a save/load cycle unchanged

use super::test_utils::{Fixture, FOX, REVENUE};
use semtree::store::{FlatIndex, StateFile};
use semtree::tree::builder::TreeBuilder;
use semtree::tree::snapshot::MerkleSnapshot;
use std::fs;

#[test]
fn test_snapshot_roundtrip_is_field_for_field() {
    let fixture = Fixture::new();
    fixture.write("a.txt", FOX);
    fixture.write("nested/deeper/b.txt", REVENUE);
    fixture.write("nested/c.txt", "c");

    let tree = TreeBuilder::new(fixture.root().to_path_buf()).build().unwrap();
    let snapshot = MerkleSnapshot::from_tree(&tree);
    let file = StateFile::new(fixture.tree_path());
    file.save(&snapshot).unwrap();

    let loaded: MerkleSnapshot = file.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_flat_index_uses_short_record_fields() {
    let fixture = Fixture::new();
    fixture.write("a.txt", FOX);
    fixture.engine().build_flat(fixture.root()).unwrap();

    let raw = fs::read_to_string(fixture.index_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value["leaves"][fixture.key("a.txt")];
    assert!(record["sha"].is_string());
    assert!(record["emb"].is_array());
    assert!(record["ts"].is_number());
    assert!(value["root_hash"].is_string());

    let loaded: FlatIndex = StateFile::new(fixture.index_path()).load().unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
}

#[test]
fn test_snapshot_uses_documented_field_names() {
    let fixture = Fixture::new();
    fixture.write("a.txt", "a");
    fixture.engine().build_tree(fixture.root()).unwrap();

    let raw = fs::read_to_string(fixture.tree_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for field in ["root_hash", "nodes", "leaves", "hierarchy"] {
        assert!(value.get(field).is_some(), "missing field {}", field);
    }
    let root = value["root_hash"].as_str().unwrap();
    assert!(value["hierarchy"][root]["files"]["a.txt"].is_string());
    assert!(value["hierarchy"][root]["subdirs"].is_object());
}
