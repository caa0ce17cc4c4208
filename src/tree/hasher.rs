//! Hash engine: deterministic hex digests over bytes and files

use crate::error::StorageError;
use crate::types::Digest;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read buffer size for streaming file digests.
const CHUNK_SIZE: usize = 4096;

/// Digest algorithm used for every leaf and interior node.
///
/// Both variants produce 256-bit digests rendered as 64 lowercase hex chars.
/// Snapshots built with different algorithms never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Digest an in-memory byte sequence.
    pub fn digest_bytes(self, data: &[u8]) -> Digest {
        let mut state = StreamingHasher::new(self);
        state.update(data);
        state.finalize()
    }

    /// Digest a file by streaming it in fixed-size chunks.
    ///
    /// Memory use is bounded by `CHUNK_SIZE` regardless of file size.
    pub fn digest_file(self, path: &Path) -> Result<Digest, StorageError> {
        let mut file = File::open(path)?;
        let mut state = StreamingHasher::new(self);
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            state.update(&buf[..n]);
        }
        Ok(state.finalize())
    }

    /// Digest the literal concatenation of hex digests, in the given order.
    pub fn digest_concat<S: AsRef<str>>(self, parts: &[S]) -> Digest {
        let mut state = StreamingHasher::new(self);
        for part in parts {
            state.update(part.as_ref().as_bytes());
        }
        state.finalize()
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

enum StreamingHasher {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl StreamingHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => StreamingHasher::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Blake3 => StreamingHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            StreamingHasher::Sha256(h) => h.update(data),
            StreamingHasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            StreamingHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamingHasher::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}
