//! Audit logger for the append-only operation log
//!
//! Each entry is written as a single JSON line and flushed immediately.
//! Logging is best-effort at the call sites: a failed audit write never
//! fails the operation it records.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry as a JSON line, flushed immediately
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Io(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries in chronological order (oldest first)
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                LedgerError::CorruptData(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries from the log
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));

        logger.log(&AuditEntry::now("add", "first")).unwrap();
        logger.log(&AuditEntry::now("delete", "second")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "add");
        assert_eq!(entries[1].action, "delete");
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_recent() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));

        for i in 0..5 {
            logger
                .log(&AuditEntry::now("add", format!("entry {}", i)))
                .unwrap();
        }

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].detail, "entry 4");
    }
}
