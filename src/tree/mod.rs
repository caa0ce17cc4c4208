//! Filesystem Merkle Tree
//!
//! Digest composition for a directory subtree: the hash engine, the flat
//! pairwise accumulator and the hierarchical directory tree.

pub mod builder;
pub mod hasher;
pub mod merkle;
pub mod node;
pub mod path;
pub mod snapshot;
pub mod walker;

pub use builder::{DirectoryTree, TreeBuilder};
pub use hasher::HashAlgorithm;
pub use snapshot::MerkleSnapshot;
