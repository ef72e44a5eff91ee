//! FK's Bank - terminal banking ledger
//!
//! This library provides the core functionality for FK's Bank: user
//! registration and login, one account per user, and deposits, withdrawals
//! and transfers recorded in an append-only transaction log, all persisted
//! in a single SQLite database.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, accounts, transactions, money)
//! - `storage`: SQLite storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `crypto`: Password hashing and secure strings
//! - `display`: Terminal formatting
//! - `shell`: Interactive menus
//!
//! # Example
//!
//! ```rust,ignore
//! use bank::config::{paths::BankPaths, settings::Settings};
//! use bank::storage::Storage;
//!
//! let paths = BankPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! ```

pub mod audit;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod shell;
pub mod storage;

pub use error::{BankError, BankResult};
