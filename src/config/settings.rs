//! User settings for FK's Bank
//!
//! Manages display preferences, the account-number allocation policy and the
//! password hashing cost parameters.

use serde::{Deserialize, Serialize};

use super::paths::BankPaths;
use crate::crypto::password::HashingParams;
use crate::error::BankError;

/// Account-number allocation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNumberSettings {
    /// Collisions tolerated in each number space before giving up on it
    pub max_attempts: u32,
}

impl Default for AccountNumberSettings {
    fn default() -> Self {
        Self { max_attempts: 32 }
    }
}

/// User settings for FK's Bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Timestamp format for transaction history (strftime format)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Account-number allocation policy
    #[serde(default)]
    pub account_numbers: AccountNumberSettings,

    /// Argon2 cost parameters for password hashing
    #[serde(default)]
    pub password_hashing: HashingParams,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            timestamp_format: default_timestamp_format(),
            account_numbers: AccountNumberSettings::default(),
            password_hashing: HashingParams::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &BankPaths) -> Result<Self, BankError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BankError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BankError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BankPaths) -> Result<(), BankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BankError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BankError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
