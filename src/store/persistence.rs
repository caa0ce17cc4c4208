//! Persistence for state snapshots
//!
//! One interface, [`StateFile`], reads and writes both persisted schemas: the
//! flat [`FlatIndex`] and the hierarchical [`MerkleSnapshot`]. They are kept
//! as separate documents with separate invariants.

use crate::error::StorageError;
use crate::store::FlatIndex;
use crate::tree::snapshot::MerkleSnapshot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A document type that can be persisted as a state file.
pub trait StateSchema: Serialize + DeserializeOwned {
    /// Human-readable schema name for logs and errors.
    const NAME: &'static str;

    /// Whether this state can serve as a verification baseline.
    fn has_baseline(&self) -> bool {
        true
    }
}

impl StateSchema for FlatIndex {
    const NAME: &'static str = "flat index";

    fn has_baseline(&self) -> bool {
        !self.is_empty()
    }
}

impl StateSchema for MerkleSnapshot {
    const NAME: &'static str = "merkle snapshot";
}

/// JSON state file holding one [`StateSchema`] document.
///
/// Read once at the start of an operation and written once at the end, with
/// no locking between processes.
#[derive(Debug, Clone)]
pub struct StateFile<T> {
    path: PathBuf,
    _schema: PhantomData<T>,
}

impl<T: StateSchema> StateFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _schema: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, `None` if the file does not exist.
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), schema = T::NAME, "No state file");
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let state = serde_json::from_reader(reader).map_err(|e| StorageError::Serialization {
            context: T::NAME,
            details: format!("{}: {}", self.path.display(), e),
        })?;
        Ok(Some(state))
    }

    /// Write the document atomically: temp sibling first, then rename.
    pub fn save(&self, state: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state).map_err(|e| {
            StorageError::Serialization {
                context: T::NAME,
                details: e.to_string(),
            }
        })?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &self.path)?;
        info!(path = %self.path.display(), schema = T::NAME, "State saved");
        Ok(())
    }
}
