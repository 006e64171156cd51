//! JSON file I/O with atomic replace
//!
//! A failed write must never leave the canonical file truncated or
//! half-written, so all writes stage to a sibling temp file first.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file, returning a default value if the file doesn't exist
///
/// Content that exists but cannot be parsed as `T` is a [`LedgerError::CorruptData`].
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| LedgerError::CorruptData(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerError::Io(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| LedgerError::CorruptData(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The temp path must be in the same directory as the target so the rename
/// cannot cross filesystems. On every exit path that did not complete the
/// rename, the temp file is removed and the target is untouched.
pub fn write_json_atomic<T, P, Q>(path: P, temp_path: Q, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = temp_path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    write_temp(temp_path, data).inspect_err(|_| {
        let _ = fs::remove_file(temp_path);
    })?;

    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        LedgerError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn write_temp<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), LedgerError> {
    let file = File::create(temp_path)
        .map_err(|e| LedgerError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Io(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Io(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Io(format!("Failed to sync data: {}", e)))?;

    Ok(())
}
