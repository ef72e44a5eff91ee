//! Path management for FK's Bank
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` command line flag (if given)
//! 2. The platform data directory for the `fk-bank` project
//!    (e.g. `~/.local/share/fk-bank` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::BankError;

/// Manages all paths used by FK's Bank
#[derive(Debug, Clone)]
pub struct BankPaths {
    /// Base directory for all bank data
    base_dir: PathBuf,
}

impl BankPaths {
    /// Resolve the default platform data directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BankError> {
        let dirs = ProjectDirs::from("", "", "fk-bank").ok_or_else(|| {
            BankError::Config("Could not determine a home directory".into())
        })?;

        Ok(Self {
            base_dir: dirs.data_dir().to_path_buf(),
        })
    }

    /// Create BankPaths with a custom base directory (`--data-dir`, tests)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve from an optional override
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self, BankError> {
        match data_dir {
            Some(dir) => Ok(Self::with_base_dir(dir)),
            None => Self::new(),
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the SQLite database
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("banking.db")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BankError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BankError::Io(format!("Failed to create data directory: {}", e)))
    }
}
