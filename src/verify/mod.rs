//! Verification/Diff Engine
//!
//! Two entry operations per composition strategy, with no state in between:
//! `build` scans the folder and writes a fresh baseline, `verify` loads the
//! baseline, rebuilds from the current filesystem, reports differences and
//! then overwrites the baseline with what it just computed.
//!
//! - **Semantic mode** ([`flat`]): flat Merkle fold plus per-file embedding
//!   classification against the leaf record store.
//! - **Exact mode** ([`structural`]): hierarchical directory tree compared
//!   field by field against the previous snapshot.

pub mod flat;
pub mod structural;

pub use flat::{FileVerdict, FlatBuildReport, SemanticReport};
pub use structural::{SnapshotField, StructuralReport, TreeBuildReport};

use crate::config::SemtreeConfig;
use crate::embedding::{create_embedder, Embedder};
use crate::error::ApiError;
use crate::semantic::SemanticPolicy;
use crate::store::StateFile;
use crate::store::{FlatIndex, StateSchema};
use crate::tree::path;
use crate::tree::snapshot::MerkleSnapshot;
use crate::tree::walker::Walker;
use std::path::{Path, PathBuf};

/// Runs build and verify for both modes with one embedder and one config.
pub struct IntegrityEngine {
    config: SemtreeConfig,
    embedder: Box<dyn Embedder>,
}

impl IntegrityEngine {
    /// Create an engine around an already-constructed embedder.
    pub fn new(config: SemtreeConfig, embedder: Box<dyn Embedder>) -> Self {
        Self { config, embedder }
    }

    /// Create an engine, instantiating the embedder named by the config.
    ///
    /// Fails before any scan if the oracle cannot be brought up.
    pub fn from_config(config: SemtreeConfig) -> Result<Self, ApiError> {
        let embedder = create_embedder(&config.embedding)?;
        Ok(Self::new(config, embedder))
    }

    fn policy(&self) -> SemanticPolicy {
        SemanticPolicy::new(self.config.semantic.threshold)
    }

    fn walker(&self) -> Walker {
        Walker::new(self.config.walker.clone())
    }

    fn index_file(&self) -> StateFile<FlatIndex> {
        StateFile::new(self.config.storage.index_path())
    }

    fn tree_file(&self) -> StateFile<MerkleSnapshot> {
        StateFile::new(self.config.storage.tree_path())
    }
}

/// Resolve the folder to scan to an absolute path.
pub fn resolve_root(folder: &Path) -> Result<PathBuf, ApiError> {
    if !folder.exists() {
        return Err(ApiError::FolderNotFound(folder.to_path_buf()));
    }
    Ok(path::canonicalize_path(folder)?)
}

/// Load a baseline, failing with `MissingBaseline` when none is usable.
fn load_baseline<T: StateSchema>(file: &StateFile<T>) -> Result<T, ApiError> {
    match file.load()? {
        Some(state) if state.has_baseline() => Ok(state),
        _ => Err(ApiError::MissingBaseline(file.path().to_path_buf())),
    }
}
