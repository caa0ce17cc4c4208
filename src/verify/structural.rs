//! Exact mode: hierarchical snapshot comparison

use super::{load_baseline, resolve_root, IntegrityEngine};
use crate::error::ApiError;
use crate::tree::builder::TreeBuilder;
use crate::tree::snapshot::MerkleSnapshot;
use crate::tree::walker::SkippedEntry;
use crate::types::Digest;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Snapshot field that differs between baseline and current tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    RootHash,
    Nodes,
    Leaves,
    Hierarchy,
}

impl SnapshotField {
    pub fn message(self) -> &'static str {
        match self {
            SnapshotField::RootHash => {
                "Root hash mismatch - directory structure or file contents have changed"
            }
            SnapshotField::Nodes => "Node hashes mismatch - file contents or structure have changed",
            SnapshotField::Leaves => {
                "Leaf nodes mismatch - files have been added, removed or modified"
            }
            SnapshotField::Hierarchy => "Hierarchy mismatch - directory structure has changed",
        }
    }
}

/// Compare two snapshots field by field.
///
/// All four fields are always checked; every mismatch is logged and returned.
/// Leaves compare as sets.
pub fn compare_snapshots(baseline: &MerkleSnapshot, current: &MerkleSnapshot) -> Vec<SnapshotField> {
    let checks = [
        (SnapshotField::RootHash, baseline.root_hash == current.root_hash),
        (SnapshotField::Nodes, baseline.nodes == current.nodes),
        (SnapshotField::Leaves, baseline.leaf_set() == current.leaf_set()),
        (SnapshotField::Hierarchy, baseline.hierarchy == current.hierarchy),
    ];

    checks
        .into_iter()
        .filter(|(_, equal)| !equal)
        .map(|(field, _)| {
            warn!(field = ?field, "{}", field.message());
            field
        })
        .collect()
}

/// Result of a hierarchical build.
#[derive(Debug, Clone, Serialize)]
pub struct TreeBuildReport {
    pub root: PathBuf,
    pub root_hash: Digest,
    pub node_count: usize,
    pub leaf_count: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Result of an exact verify.
#[derive(Debug, Clone, Serialize)]
pub struct StructuralReport {
    pub root: PathBuf,
    pub previous_root_hash: Digest,
    pub root_hash: Digest,
    pub mismatches: Vec<SnapshotField>,
    /// Node paths whose (digest, path) pair is new in the current tree.
    pub appeared: Vec<String>,
    /// Node paths whose (digest, path) pair is gone from the current tree.
    pub disappeared: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl StructuralReport {
    pub fn is_intact(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl IntegrityEngine {
    fn tree_builder(&self, root: &Path) -> TreeBuilder {
        TreeBuilder::new(root.to_path_buf())
            .with_algorithm(self.config.hashing.algorithm)
            .with_walker_config(self.config.walker.clone())
    }

    /// Build the hierarchical tree for `folder` and persist its snapshot.
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    pub fn build_tree(&self, folder: &Path) -> Result<TreeBuildReport, ApiError> {
        let root = resolve_root(folder)?;
        let tree = self.tree_builder(&root).build()?;
        let snapshot = MerkleSnapshot::from_tree(&tree);
        self.tree_file().save(&snapshot)?;

        Ok(TreeBuildReport {
            root,
            root_hash: snapshot.root_hash.clone(),
            node_count: snapshot.nodes.len(),
            leaf_count: snapshot.leaves.len(),
            skipped: tree.skipped().to_vec(),
        })
    }

    /// Rebuild the tree, compare it with the stored snapshot and re-baseline.
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    pub fn verify_tree(&self, folder: &Path) -> Result<StructuralReport, ApiError> {
        let root = resolve_root(folder)?;
        let tree_file = self.tree_file();
        let baseline = load_baseline(&tree_file)?;

        let tree = self.tree_builder(&root).build()?;
        let current = MerkleSnapshot::from_tree(&tree);

        let mismatches = compare_snapshots(&baseline, &current);
        let (appeared, disappeared) = node_changes(&baseline, &current);
        if mismatches.is_empty() {
            info!("Merkle tree integrity verified - no changes detected");
        }

        tree_file.save(&current)?;

        Ok(StructuralReport {
            root,
            previous_root_hash: baseline.root_hash,
            root_hash: current.root_hash,
            mismatches,
            appeared,
            disappeared,
            skipped: tree.skipped().to_vec(),
        })
    }
}

fn node_changes(baseline: &MerkleSnapshot, current: &MerkleSnapshot) -> (Vec<String>, Vec<String>) {
    let old: BTreeSet<(&Digest, &String)> = baseline.nodes.iter().collect();
    let new: BTreeSet<(&Digest, &String)> = current.nodes.iter().collect();

    let paths = |a: &BTreeSet<(&Digest, &String)>, b: &BTreeSet<(&Digest, &String)>| {
        a.difference(b)
            .map(|(_, path)| (*path).clone())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect::<Vec<_>>()
    };

    (paths(&new, &old), paths(&old, &new))
}
