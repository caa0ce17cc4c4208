//! Leaf Record Store
//!
//! Maps each file path to its last accepted digest, embedding and observation
//! time. Together with the flat root this forms the persisted flat index.

pub mod persistence;

pub use persistence::{StateFile, StateSchema};

use crate::tree::hasher::HashAlgorithm;
use crate::tree::merkle;
use crate::types::{Digest, Embedding};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last accepted state of one file.
///
/// Records are only ever replaced whole; digest, embedding and timestamp
/// always describe the same observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafRecord {
    #[serde(rename = "sha")]
    pub digest: Digest,
    #[serde(rename = "emb")]
    pub embedding: Embedding,
    /// Seconds since the Unix epoch.
    #[serde(rename = "ts")]
    pub observed_at: f64,
}

impl LeafRecord {
    /// Create a record stamped with the current time.
    pub fn new(digest: Digest, embedding: Embedding) -> Self {
        Self {
            digest,
            embedding,
            observed_at: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}

/// Flat index: leaf records keyed by path plus the folded root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatIndex {
    #[serde(default)]
    pub leaves: BTreeMap<String, LeafRecord>,
    #[serde(default)]
    pub root_hash: Digest,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&LeafRecord> {
        self.leaves.get(path)
    }

    /// Replace the record for `path`, returning the previous one.
    pub fn replace(&mut self, path: &str, record: LeafRecord) -> Option<LeafRecord> {
        self.leaves.insert(path.to_string(), record)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.leaves.keys()
    }

    /// Stored digests in path order.
    pub fn ordered_digests(&self) -> Vec<&Digest> {
        self.leaves.values().map(|record| &record.digest).collect()
    }

    /// Fold the stored digests into `root_hash` and return it.
    pub fn recompute_root(&mut self, algorithm: HashAlgorithm) -> &Digest {
        self.root_hash = merkle::fold(algorithm, &self.ordered_digests());
        &self.root_hash
    }
}
