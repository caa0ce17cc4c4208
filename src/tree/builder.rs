//! Tree builder for constructing hierarchical directory digests

use crate::error::StorageError;
use crate::tree::hasher::HashAlgorithm;
use crate::tree::node::{DirectoryContents, NodeKind, TreeNode};
use crate::tree::path;
use crate::tree::walker::{SkippedEntry, Walker, WalkerConfig};
use crate::types::{Digest, EMPTY_ROOT};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Complete hierarchical digest tree for one root directory.
///
/// Node and hierarchy maps are keyed by digest. Files with identical content
/// share one digest, so the node map keeps the path seen last in traversal
/// order.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    root_path: String,
    algorithm: HashAlgorithm,
    nodes: BTreeMap<Digest, TreeNode>,
    hierarchy: BTreeMap<Digest, DirectoryContents>,
    parent_map: HashMap<Digest, Digest>,
    skipped: Vec<SkippedEntry>,
}

impl DirectoryTree {
    /// Root digest: the digest whose recorded path is the tree's root path.
    ///
    /// Empty when the root contributed no digest (no readable files anywhere).
    pub fn root_digest(&self) -> Digest {
        self.nodes
            .values()
            .find(|node| node.kind == NodeKind::Directory && node.path == self.root_path)
            .map(|node| node.digest.clone())
            .unwrap_or_else(|| EMPTY_ROOT.to_string())
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn nodes(&self) -> &BTreeMap<Digest, TreeNode> {
        &self.nodes
    }

    pub fn hierarchy(&self) -> &BTreeMap<Digest, DirectoryContents> {
        &self.hierarchy
    }

    /// Entries excluded during traversal.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Digests of all file nodes.
    pub fn leaves(&self) -> BTreeSet<Digest> {
        self.nodes
            .values()
            .filter(|node| node.kind == NodeKind::File)
            .map(|node| node.digest.clone())
            .collect()
    }

    pub fn path_of(&self, digest: &str) -> Option<&str> {
        self.nodes.get(digest).map(|node| node.path.as_str())
    }

    /// Child digests of a directory node; empty for files and unknown digests.
    pub fn children(&self, digest: &str) -> Vec<Digest> {
        self.hierarchy
            .get(digest)
            .map(|contents| contents.child_digests().cloned().collect())
            .unwrap_or_default()
    }

    /// Parent directory digest, `None` for the root and unknown digests.
    pub fn parent(&self, digest: &str) -> Option<&Digest> {
        self.parent_map.get(digest)
    }

    /// Check whether a file's current content digest is a node of this tree.
    ///
    /// A file that no longer exists does not verify.
    pub fn contains_file(&self, file: &Path) -> Result<bool, StorageError> {
        if !file.is_file() {
            return Ok(false);
        }
        let digest = self.algorithm.digest_file(file)?;
        Ok(self.nodes.contains_key(&digest))
    }
}

/// Tree builder for constructing hierarchical directory digests
pub struct TreeBuilder {
    root: PathBuf,
    algorithm: HashAlgorithm,
    walker_config: WalkerConfig,
}

#[derive(Default)]
struct BuildState {
    nodes: BTreeMap<Digest, TreeNode>,
    hierarchy: BTreeMap<Digest, DirectoryContents>,
    skipped: Vec<SkippedEntry>,
}

impl TreeBuilder {
    /// Create a new tree builder for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            algorithm: HashAlgorithm::default(),
            walker_config: WalkerConfig::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Build the complete tree from the filesystem.
    ///
    /// Recurses depth-first so every directory digest is computed after the
    /// digests of all of its children.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<DirectoryTree, StorageError> {
        let start = Instant::now();
        info!("Starting tree build");

        let root = path::canonicalize_path(&self.root)?;
        let root_path = path::path_key(&root).ok_or_else(|| {
            StorageError::InvalidPath(format!("{} is not valid UTF-8", root.display()))
        })?;
        let walker = Walker::new(self.walker_config.clone());
        let mut state = BuildState::default();

        self.hash_directory(&walker, &root, &root_path, &mut state);

        let mut parent_map = HashMap::new();
        for (dir_digest, contents) in &state.hierarchy {
            for child in contents.child_digests() {
                parent_map.insert(child.clone(), dir_digest.clone());
            }
        }

        let tree = DirectoryTree {
            root_path,
            algorithm: self.algorithm,
            nodes: state.nodes,
            hierarchy: state.hierarchy,
            parent_map,
            skipped: state.skipped,
        };

        info!(
            node_count = tree.nodes.len(),
            skipped = tree.skipped.len(),
            root_hash = %tree.root_digest(),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );

        Ok(tree)
    }

    /// Convenience wrapper returning only the root digest.
    pub fn compute_root(&self) -> Result<Digest, StorageError> {
        Ok(self.build()?.root_digest())
    }

    /// Digest one directory; `None` when nothing beneath it contributed.
    ///
    /// `dir_key` is the directory's key; entries whose names are not valid
    /// UTF-8 are skipped rather than keyed lossily.
    fn hash_directory(
        &self,
        walker: &Walker,
        dir: &Path,
        dir_key: &str,
        state: &mut BuildState,
    ) -> Option<Digest> {
        let listing = walker.list_dir(dir);
        state.skipped.extend(listing.skipped);

        let mut hashes: Vec<Digest> = Vec::new();
        let mut contents = DirectoryContents::default();

        for file in &listing.files {
            let Some((key, name)) = keyed(file, &mut state.skipped) else {
                continue;
            };
            let digest = match self.algorithm.digest_file(file) {
                Ok(d) => d,
                Err(e) => {
                    state
                        .skipped
                        .push(SkippedEntry::new(file, format!("unreadable file: {}", e)));
                    continue;
                }
            };
            trace!(path = %file.display(), digest = %digest, "Hashed file");

            state.nodes.insert(
                digest.clone(),
                TreeNode {
                    digest: digest.clone(),
                    path: key,
                    kind: NodeKind::File,
                },
            );
            contents.files.insert(name, digest.clone());
            hashes.push(digest);
        }

        for subdir in &listing.subdirs {
            let Some((key, name)) = keyed(subdir, &mut state.skipped) else {
                continue;
            };
            if let Some(digest) = self.hash_directory(walker, subdir, &key, state) {
                contents.subdirs.insert(name, digest.clone());
                hashes.push(digest);
            }
        }

        if hashes.is_empty() {
            debug!(path = %dir.display(), "Directory contributed no digest");
            return None;
        }

        // Combination order is canonical on digest value, not on path.
        hashes.sort();
        let dir_digest = self.algorithm.digest_concat(&hashes);

        state.nodes.insert(
            dir_digest.clone(),
            TreeNode {
                digest: dir_digest.clone(),
                path: dir_key.to_string(),
                kind: NodeKind::Directory,
            },
        );
        state.hierarchy.insert(dir_digest.clone(), contents);
        Some(dir_digest)
    }
}

/// Key and basename of an entry, or a skip when its name is not valid UTF-8.
fn keyed(entry: &Path, skipped: &mut Vec<SkippedEntry>) -> Option<(String, String)> {
    let key = path::path_key(entry);
    let name = entry.file_name().and_then(|n| n.to_str());
    match (key, name) {
        (Some(key), Some(name)) => Some((key, name.to_string())),
        _ => {
            skipped.push(SkippedEntry::new(entry, "path is not valid UTF-8"));
            None
        }
    }
}
