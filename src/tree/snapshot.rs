//! Persisted form of a hierarchical tree

use crate::tree::builder::DirectoryTree;
use crate::tree::node::DirectoryContents;
use crate::types::Digest;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable record of a [`DirectoryTree`] at one point in time.
///
/// Verification builds a fresh snapshot and compares; an existing snapshot is
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleSnapshot {
    pub root_hash: Digest,
    pub nodes: BTreeMap<Digest, String>,
    /// File digests. Compared as a set.
    pub leaves: Vec<Digest>,
    pub hierarchy: BTreeMap<Digest, DirectoryContents>,
}

impl MerkleSnapshot {
    pub fn from_tree(tree: &DirectoryTree) -> Self {
        Self {
            root_hash: tree.root_digest(),
            nodes: tree
                .nodes()
                .iter()
                .map(|(digest, node)| (digest.clone(), node.path.clone()))
                .collect(),
            leaves: tree.leaves().into_iter().collect(),
            hierarchy: tree.hierarchy().clone(),
        }
    }

    pub fn leaf_set(&self) -> BTreeSet<&Digest> {
        self.leaves.iter().collect()
    }
}
