//! Node types for the hierarchical directory tree

use crate::types::Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of filesystem node a digest stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
}

/// A digest together with the path it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub digest: Digest,
    pub path: String,
    pub kind: NodeKind,
}

/// Immediate children of a directory node, keyed by basename.
///
/// Subdirectories that contributed no digest (empty subtrees) are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryContents {
    #[serde(default)]
    pub files: BTreeMap<String, Digest>,
    #[serde(default)]
    pub subdirs: BTreeMap<String, Digest>,
}

impl DirectoryContents {
    /// All child digests, files first then subdirectories, each in basename order.
    pub fn child_digests(&self) -> impl Iterator<Item = &Digest> {
        self.files.values().chain(self.subdirs.values())
    }
}
