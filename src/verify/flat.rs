//! Semantic mode: flat Merkle root plus embedding-based change classification

use super::{load_baseline, resolve_root, IntegrityEngine};
use crate::embedding::decode_text;
use crate::error::ApiError;
use crate::semantic::{Classification, Classifier};
use crate::store::{FlatIndex, LeafRecord};
use crate::tree::merkle;
use crate::tree::path::path_key;
use crate::tree::walker::SkippedEntry;
use crate::types::Digest;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// Result of a flat build.
#[derive(Debug, Clone, Serialize)]
pub struct FlatBuildReport {
    pub root: PathBuf,
    pub root_hash: Digest,
    pub file_count: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Per-file result of a semantic verify.
#[derive(Debug, Clone, Serialize)]
pub struct FileVerdict {
    pub path: String,
    pub classification: Classification,
    pub similarity: Option<f64>,
}

/// Result of a semantic verify.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticReport {
    pub root: PathBuf,
    pub previous_root_hash: Digest,
    pub root_hash: Digest,
    pub files: Vec<FileVerdict>,
    /// Recorded paths under the root that no longer exist. Their records are kept.
    pub missing: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl SemanticReport {
    /// Paths classified as new or semantically changed, in scan order.
    pub fn changed_paths(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.classification.is_changed())
            .map(|f| f.path.as_str())
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.files.iter().any(|f| f.classification.is_changed())
    }
}

impl IntegrityEngine {
    /// Scan `folder`, record every file and persist a fresh flat index.
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    pub fn build_flat(&self, folder: &Path) -> Result<FlatBuildReport, ApiError> {
        let start = Instant::now();
        let root = resolve_root(folder)?;
        let algorithm = self.config.hashing.algorithm;
        info!("Starting flat build");

        let listing = self.walker().walk_files(&root);
        let mut skipped = listing.skipped;
        let mut index = FlatIndex::new();

        for file in &listing.files {
            let Some((key, raw)) = read_keyed(file, &mut skipped) else {
                continue;
            };
            let embedding = self
                .embedder
                .embed(&decode_text(&raw))
                .map_err(|e| ApiError::Embedding {
                    path: key.clone(),
                    reason: e.to_string(),
                })?;
            index.replace(&key, LeafRecord::new(algorithm.digest_bytes(&raw), embedding));
        }

        let root_hash = index.recompute_root(algorithm).clone();
        self.index_file().save(&index)?;

        info!(
            file_count = index.len(),
            root_hash = %root_hash,
            duration_ms = start.elapsed().as_millis(),
            "Flat build completed"
        );

        Ok(FlatBuildReport {
            root,
            root_hash,
            file_count: index.len(),
            skipped,
        })
    }

    /// Classify every file against the stored records and re-baseline.
    ///
    /// The new root folds the digests of the bytes currently on disk, so it
    /// moves even when every file is classified unchanged.
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    pub fn verify_flat(&self, folder: &Path) -> Result<SemanticReport, ApiError> {
        let start = Instant::now();
        let root = resolve_root(folder)?;
        let index_file = self.index_file();
        let mut index = load_baseline(&index_file)?;
        let previous_root_hash = index.root_hash.clone();
        info!("Starting semantic verify");

        let algorithm = self.config.hashing.algorithm;
        let classifier = Classifier::new(self.embedder.as_ref(), self.policy(), algorithm);

        let listing = self.walker().walk_files(&root);
        let mut skipped = listing.skipped;
        let mut files = Vec::with_capacity(listing.files.len());
        let mut current: BTreeMap<String, Digest> = BTreeMap::new();

        for file in &listing.files {
            let Some((key, raw)) = read_keyed(file, &mut skipped) else {
                continue;
            };
            let outcome = classifier.classify(&mut index, &key, &raw, &decode_text(&raw))?;

            files.push(FileVerdict {
                path: key.clone(),
                classification: outcome.classification,
                similarity: outcome.similarity,
            });
            current.insert(key, outcome.digest);
        }

        let seen: BTreeSet<&String> = current.keys().collect();
        let missing: Vec<String> = index
            .paths()
            .filter(|p| Path::new(p.as_str()).starts_with(&root) && !seen.contains(p))
            .cloned()
            .collect();

        let root_hash = merkle::fold(algorithm, &current.values().collect::<Vec<_>>());
        index.root_hash = root_hash.clone();
        index_file.save(&index)?;

        let report = SemanticReport {
            root,
            previous_root_hash,
            root_hash,
            files,
            missing,
            skipped,
        };
        info!(
            changed = report.changed_paths().len(),
            missing = report.missing.len(),
            root_hash = %report.root_hash,
            duration_ms = start.elapsed().as_millis(),
            "Semantic verify completed"
        );
        Ok(report)
    }
}

/// Key and contents of a listed file; unkeyable or unreadable files become skips.
fn read_keyed(file: &Path, skipped: &mut Vec<SkippedEntry>) -> Option<(String, Vec<u8>)> {
    let Some(key) = path_key(file) else {
        skipped.push(SkippedEntry::new(file, "path is not valid UTF-8"));
        return None;
    };
    match fs::read(file) {
        Ok(raw) => Some((key, raw)),
        Err(e) => {
            skipped.push(SkippedEntry::new(file, format!("unreadable file: {}", e)));
            None
        }
    }
}
