//! Configuration module for FK's Bank
//!
//! This module provides configuration management including:
//! - Platform-specific path resolution for the database, settings and audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BankPaths;
pub use settings::Settings;
