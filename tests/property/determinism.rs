//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use semtree::embedding::{cosine_similarity, Embedder, HashedEmbedder};
use semtree::semantic::SemanticPolicy;
use semtree::tree::hasher::HashAlgorithm;
use semtree::tree::merkle;
use semtree::tree::builder::TreeBuilder;
use std::fs;
use tempfile::TempDir;

fn digest_strategy() -> impl Strategy<Value = String> {
    any::<Vec<u8>>().prop_map(|bytes| HashAlgorithm::Sha256.digest_bytes(&bytes))
}

proptest! {
    /// Same leaves, same root
    #[test]
    fn prop_fold_is_deterministic(leaves in prop::collection::vec(digest_strategy(), 0..40)) {
        let a = merkle::fold(HashAlgorithm::Sha256, &leaves);
        let b = merkle::fold(HashAlgorithm::Sha256, &leaves);
        prop_assert_eq!(a, b);
    }

    /// An odd last leaf pairs with itself: appending a copy of it changes nothing
    #[test]
    fn prop_odd_leaf_duplication(leaves in prop::collection::vec(digest_strategy(), 1..20)) {
        prop_assume!(leaves.len() % 2 == 1 && leaves.len() > 1);
        let mut padded = leaves.clone();
        padded.push(leaves[leaves.len() - 1].clone());
        prop_assert_eq!(
            merkle::fold(HashAlgorithm::Sha256, &leaves),
            merkle::fold(HashAlgorithm::Sha256, &padded)
        );
    }

    /// Changing any single leaf moves the root
    #[test]
    fn prop_fold_detects_any_leaf_change(
        leaves in prop::collection::vec(digest_strategy(), 1..20),
        index in any::<prop::sample::Index>(),
    ) {
        let i = index.index(leaves.len());
        let mut changed = leaves.clone();
        changed[i] = HashAlgorithm::Sha256.digest_bytes(changed[i].as_bytes());
        prop_assert_ne!(
            merkle::fold(HashAlgorithm::Sha256, &leaves),
            merkle::fold(HashAlgorithm::Sha256, &changed)
        );
    }

    /// A flat directory digests to the sorted concatenation of its file digests
    #[test]
    fn prop_directory_digest_is_sorted_concat(
        files in prop::collection::btree_map("[a-z]{1,6}", any::<Vec<u8>>(), 1..6)
    ) {
        let temp_dir = TempDir::new().unwrap();
        for (name, contents) in &files {
            fs::write(temp_dir.path().join(name), contents).unwrap();
        }

        let mut children: Vec<String> = files
            .values()
            .map(|contents| HashAlgorithm::Sha256.digest_bytes(contents))
            .collect();
        children.sort();

        let root = TreeBuilder::new(temp_dir.path().to_path_buf()).compute_root().unwrap();
        prop_assert_eq!(root, HashAlgorithm::Sha256.digest_concat(&children));
    }

    /// Threshold comparison is strict
    #[test]
    fn prop_threshold_strict(threshold in -1.0f64..1.0) {
        let policy = SemanticPolicy::new(threshold);
        prop_assert!(!policy.is_drift(threshold));
        prop_assert!(policy.is_drift(threshold - 1e-6));
    }

    /// Whitespace never moves the hashed embedding
    #[test]
    fn prop_hashed_embedding_ignores_whitespace(words in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let embedder = HashedEmbedder::new(384).unwrap();
        let single = embedder.embed(&words.join(" ")).unwrap();
        let spread = embedder.embed(&words.join("  \n\t")).unwrap();
        prop_assert!(cosine_similarity(&single, &spread) > 0.999);
    }
}

/// File contents written in any order build the same tree
#[test]
fn test_tree_root_independent_of_write_order() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(16));

    runner
        .run(
            &prop::collection::btree_map("[a-z]{1,6}", any::<Vec<u8>>(), 1..6),
            |files| {
                let forward = TempDir::new().unwrap();
                let backward = TempDir::new().unwrap();
                for (name, contents) in &files {
                    fs::write(forward.path().join(name), contents).unwrap();
                }
                for (name, contents) in files.iter().rev() {
                    fs::write(backward.path().join(name), contents).unwrap();
                }

                let root1 = TreeBuilder::new(forward.path().to_path_buf()).compute_root().unwrap();
                let root2 = TreeBuilder::new(backward.path().to_path_buf()).compute_root().unwrap();
                prop_assert_eq!(root1, root2);
                Ok(())
            },
        )
        .unwrap();
}
