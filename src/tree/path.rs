//! Path canonicalization and key utilities
//!
//! Paths that are opened are always the canonical form returned by the
//! filesystem. Keys are the exact UTF-8 spelling of those paths: two names
//! that differ only in Unicode normalization are distinct files on disk and
//! stay distinct keys.

use crate::error::StorageError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Resolve a user-supplied root folder to an absolute path.
///
/// Resolves symlinks, `..` and `.`. The returned spelling is the one the
/// filesystem reports, so it can be opened as is.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, StorageError> {
    // dunce avoids UNC prefixes on Windows
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!("Failed to canonicalize {}: {}", path.display(), e))
    })
}

/// Remove trailing separators (except root) without filesystem access.
pub fn normalize_path_string(path: &str) -> String {
    let mut result = path.to_string();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Stable string key for a path, used by the node map and the leaf record store.
///
/// `None` for paths that are not valid UTF-8; those cannot be keyed without
/// merging them with other names.
pub fn path_key(path: &Path) -> Option<String> {
    path.to_str().map(normalize_path_string)
}

/// Compare two entry names under NFC, so configured patterns match however
/// the filesystem happens to spell the name.
pub fn names_match(name: &str, pattern: &str) -> bool {
    name.nfc().eq(pattern.nfc())
}
