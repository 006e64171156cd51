//! Storage layer for spendlog
//!
//! The whole dataset is persisted as one JSON document. Every mutating
//! operation performs a full load-mutate-save cycle, so each command sees
//! the latest on-disk state. There is exactly one writer by design; a
//! multi-client deployment would need file locking or a transactional store.

pub mod file_io;

pub use file_io::{read_json, read_json_required, write_json_atomic};

use std::fs;

use crate::config::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Dataset;

/// The record store: owns the canonical file, the atomic-replace staging
/// path and the single rolling backup slot
pub struct Store {
    paths: LedgerPaths,
}

impl Store {
    /// Create a store over the given paths
    pub fn new(paths: LedgerPaths) -> Self {
        Self { paths }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Create the data file with an empty dataset if it doesn't exist.
    /// Idempotent.
    pub fn ensure_initialized(&self) -> LedgerResult<()> {
        self.paths.ensure_directories()?;
        if !self.paths.data_file().exists() {
            write_json_atomic(
                self.paths.data_file(),
                self.paths.temp_file(),
                &Dataset::default(),
            )?;
        }
        Ok(())
    }

    /// Load the full dataset
    ///
    /// An absent file yields the empty dataset; unparsable content fails
    /// with [`LedgerError::CorruptData`]; missing keys default to empty.
    pub fn load(&self) -> LedgerResult<Dataset> {
        read_json(self.paths.data_file())
    }

    /// Persist the full dataset atomically, refreshing the backup slot
    ///
    /// The slot is refreshed from the canonical file just before it is
    /// replaced, so after a successful save it holds exactly the state that
    /// was canonical immediately before — enabling a one-step
    /// [`Store::undo_last`]. The copy is best-effort: a failure to refresh
    /// the slot never fails the save.
    pub fn save(&self, dataset: &Dataset) -> LedgerResult<()> {
        self.paths.ensure_directories()?;
        let data_file = self.paths.data_file();
        if data_file.exists() {
            let _ = fs::copy(&data_file, self.paths.backup_file());
        }
        write_json_atomic(&data_file, self.paths.temp_file(), dataset)
    }

    /// Reset to the empty dataset
    pub fn clear(&self) -> LedgerResult<()> {
        self.save(&Dataset::default())
    }

    /// Write the current dataset to an arbitrary backup path
    pub fn backup_to(&self, path: &std::path::Path) -> LedgerResult<()> {
        let dataset = self.load()?;
        let contents = serde_json::to_string_pretty(&dataset)
            .map_err(|e| LedgerError::Io(format!("Failed to serialize backup: {}", e)))?;
        fs::write(path, contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Replace the current dataset with the one stored at `path`
    ///
    /// A best-effort safety copy of the canonical file is taken first, so a
    /// mistaken restore can be recovered by hand.
    pub fn restore_from(&self, path: &std::path::Path) -> LedgerResult<()> {
        let dataset: Dataset = read_json_required(path)?;
        let _ = fs::copy(self.paths.data_file(), self.paths.pre_restore_file());
        self.save(&dataset)
    }

    /// Reload the backup slot as the canonical dataset
    ///
    /// One-step undo only: the slot holds exactly the state that was
    /// canonical before the last save. Returns false when no backup exists.
    pub fn undo_last(&self) -> LedgerResult<bool> {
        if !self.paths.backup_file().exists() {
            return Ok(false);
        }
        let dataset: Dataset = read_json_required(self.paths.backup_file())?;
        self.save(&dataset)?;
        Ok(true)
    }
}
