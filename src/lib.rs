//! Semtree: Semantic Merkle Integrity Trees
//!
//! Builds Merkle fingerprints of a directory and later tells whether it has
//! changed. Two composition strategies are provided:
//!
//! - **Exact**: a hierarchical directory tree whose root moves on any byte,
//!   file or directory change.
//! - **Semantic**: a flat Merkle fold over per-file digests, where a file only
//!   counts as changed when the embedding of its text drifts below a cosine
//!   similarity threshold.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod logging;
pub mod semantic;
pub mod store;
pub mod tree;
pub mod types;
pub mod verify;
