//! Core type aliases shared across the tree, store and verification layers.

/// Lowercase hex digest produced by the hash engine (64 chars for 256-bit digests).
pub type Digest = String;

/// Fixed-dimension embedding vector produced by an [`crate::embedding::Embedder`].
pub type Embedding = Vec<f32>;

/// Root digest of a tree with no leaves.
pub const EMPTY_ROOT: &str = "";
