//! Audit logger for the append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{BankError, BankResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the audit log file
///
/// A logger without a path discards entries; in-memory stores use it.
pub struct AuditLogger {
    log_path: Option<PathBuf>,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path: Some(log_path),
        }
    }

    /// A logger that discards every entry
    pub fn disabled() -> Self {
        Self { log_path: None }
    }

    /// Log an audit entry
    pub fn log(&self, entry: &AuditEntry) -> BankResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Log several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> BankResult<()> {
        let Some(path) = &self.log_path else {
            return Ok(());
        };
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| BankError::Io(format!("Failed to open audit log: {}", e)))?;

        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| BankError::Json(format!("Failed to serialize audit entry: {}", e)))?;

            writeln!(file, "{}", json)
                .map_err(|e| BankError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| BankError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all audit entries, oldest first
    pub fn read_all(&self) -> BankResult<Vec<AuditEntry>> {
        let Some(path) = self.log_path.as_deref().filter(|p| p.exists()) else {
            return Ok(Vec::new());
        };

        let file = File::open(path)
            .map_err(|e| BankError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                BankError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                BankError::Json(format!(
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
    pub fn read_recent(&self, count: usize) -> BankResult<Vec<AuditEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Get the path to the audit log file, if logging is enabled
    pub fn path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}
