//! Filesystem walker for traversing directory structures
//!
//! Entries that cannot be read are never fatal here. They are collected as
//! [`SkippedEntry`] values and handed back to the caller next to the listing.

use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// An entry excluded from traversal, with the reason it was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let entry = Self {
            path: path.into(),
            reason: reason.into(),
        };
        warn!(path = %entry.path.display(), reason = %entry.reason, "Skipping entry");
        entry
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false for determinism)
    pub follow_symlinks: bool,
    /// Path components to exclude (e.g. ".git")
    pub ignore_patterns: Vec<String>,
}

/// Every regular file under a root, in path order.
#[derive(Debug, Clone, Default)]
pub struct FileListing {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

/// Immediate children of one directory, each list sorted by full path.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    pub files: Vec<PathBuf>,
    pub subdirs: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

/// Filesystem walker
#[derive(Debug, Clone)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Recursively collect every file under `root`, sorted by path.
    pub fn walk_files(&self, root: &Path) -> FileListing {
        let mut listing = FileListing::default();

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_ignore(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    listing.skipped.push(SkippedEntry::new(path, e.to_string()));
                    continue;
                }
            };

            if entry.file_type().is_file() {
                listing.files.push(entry.into_path());
            } else if entry.path_is_symlink() && !self.config.follow_symlinks {
                listing
                    .skipped
                    .push(SkippedEntry::new(entry.into_path(), "symbolic link not followed"));
            } else if !is_dir(&entry) {
                listing
                    .skipped
                    .push(SkippedEntry::new(entry.into_path(), "not a regular file"));
            }
        }

        listing.files.sort();
        listing
    }

    /// List the immediate children of `dir`, split into files and subdirectories.
    ///
    /// An unreadable directory yields an empty listing plus one skip.
    pub fn list_dir(&self, dir: &Path) -> DirListing {
        let mut listing = DirListing::default();

        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                listing
                    .skipped
                    .push(SkippedEntry::new(dir, format!("unreadable directory: {}", e)));
                return listing;
            }
        };

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    listing
                        .skipped
                        .push(SkippedEntry::new(dir, format!("unreadable entry: {}", e)));
                    continue;
                }
            };
            let path = entry.path();
            if self.should_ignore(&path) {
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    listing.skipped.push(SkippedEntry::new(path, e.to_string()));
                    continue;
                }
            };

            let (is_file, is_dir) = if file_type.is_symlink() {
                if !self.config.follow_symlinks {
                    listing
                        .skipped
                        .push(SkippedEntry::new(path, "symbolic link not followed"));
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(meta) => (meta.is_file(), meta.is_dir()),
                    Err(e) => {
                        listing
                            .skipped
                            .push(SkippedEntry::new(path, format!("dangling link: {}", e)));
                        continue;
                    }
                }
            } else {
                (file_type.is_file(), file_type.is_dir())
            };

            if is_file {
                listing.files.push(path);
            } else if is_dir {
                listing.subdirs.push(path);
            } else {
                listing
                    .skipped
                    .push(SkippedEntry::new(path, "not a regular file"));
            }
        }

        listing.files.sort();
        listing.subdirs.sort();
        listing
    }

    /// Check whether an entry name matches an ignore pattern.
    fn should_ignore(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| path::names_match(&name, pattern))
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(WalkerConfig::default())
    }
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
}
