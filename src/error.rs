//! Custom error types for FK's Bank
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. User-facing errors (validation, business
//! rules, not found) are reported and the session continues; everything else
//! is treated as an unexpected failure by the shell.

use thiserror::Error;

/// The main error type for banking operations
#[derive(Error, Debug)]
pub enum BankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// Blank fields, non-numeric input, non-positive amounts
    #[error("{0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Registrant is below the minimum age
    #[error("You must be at least {minimum} years old to register.")]
    Underage { age: i64, minimum: i64 },

    /// Password and confirmation differ
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Unknown username or wrong password, deliberately indistinguishable
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Insufficient balance for a withdrawal or transfer
    #[error("Insufficient balance! Requested {needed}, available {available}")]
    InsufficientFunds { needed: String, available: String },

    /// No free account number could be found
    #[error("Could not allocate an account number after {attempts} attempts")]
    AccountNumberExhausted { attempts: u32 },

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

impl BankError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "duplicate" error for usernames
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Username",
            identifier: username.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a business-rule violation
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::Duplicate { .. }
                | Self::Underage { .. }
                | Self::PasswordMismatch
                | Self::InvalidCredentials
                | Self::InsufficientFunds { .. }
        )
    }

    /// Errors that are reported to the user without ending the session
    pub fn is_user_facing(&self) -> bool {
        self.is_validation() || self.is_business_rule() || self.is_not_found()
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for BankError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for banking operations
pub type BankResult<T> = Result<T, BankError>;
