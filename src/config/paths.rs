//! Path management for spendlog
//!
//! Provides XDG-compliant path resolution for the data file, its atomic-write
//! staging path, the single backup slot, and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `SPENDLOG_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_DATA_HOME/spendlog` or `~/.local/share/spendlog`
//! 3. Windows: `%APPDATA%\spendlog`

use std::path::PathBuf;

use crate::error::LedgerError;

/// Manages all paths used by spendlog
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for all spendlog data
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Create a new LedgerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = if let Ok(custom) = std::env::var("SPENDLOG_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Canonical data file holding the whole dataset
    pub fn data_file(&self) -> PathBuf {
        self.base_dir.join("expenses.json")
    }

    /// Staging path for atomic replace, always in the same directory as the
    /// canonical file so the rename cannot cross filesystems
    pub fn temp_file(&self) -> PathBuf {
        self.base_dir.join("expenses.json.tmp")
    }

    /// The single rolling backup slot, refreshed after every successful save
    pub fn backup_file(&self) -> PathBuf {
        self.base_dir.join("expenses.backup.json")
    }

    /// Safety copy taken just before a restore overwrites the canonical file
    pub fn pre_restore_file(&self) -> PathBuf {
        self.base_dir.join("expenses.json.pre_restore.backup")
    }

    /// Append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;
        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    // Unix (Linux/macOS): Use XDG_DATA_HOME if set, otherwise ~/.local/share
    let data_base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".local").join("share"))
                .map_err(|_| LedgerError::Io("Could not determine home directory".into()))
        })?;
    Ok(data_base.join("spendlog"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LedgerError::Io("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("spendlog"))
}
