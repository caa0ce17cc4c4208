//! Flat Merkle accumulator
//!
//! Folds an ordered sequence of leaf digests into a single root by hashing
//! consecutive pairs level by level. A trailing odd element is paired with
//! itself rather than promoted, so `[a, b, c]` folds to
//! `H(H(a+b) + H(c+c))`. The result does not support inclusion proofs.

use crate::tree::hasher::HashAlgorithm;
use crate::types::{Digest, EMPTY_ROOT};

/// Fold leaf digests into a root digest.
///
/// Callers must supply leaves in a stable order (path order); pair hashing is
/// order-sensitive. An empty input yields [`EMPTY_ROOT`], a single leaf is
/// returned unchanged.
pub fn fold<S: AsRef<str>>(algorithm: HashAlgorithm, leaves: &[S]) -> Digest {
    if leaves.is_empty() {
        return EMPTY_ROOT.to_string();
    }

    let mut level: Vec<Digest> = leaves.iter().map(|l| l.as_ref().to_string()).collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                algorithm.digest_concat(&[left, right])
            })
            .collect();
    }

    level.swap_remove(0)
}
