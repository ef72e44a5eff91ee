//! Audit logging for FK's Bank
//!
//! Records every registration, account provisioning, balance change,
//! transaction and session event in an append-only audit log.
//!
//! - `AuditEntry`: a single entry with timestamp, operation, entity
//!   information, and optional before/after snapshots.
//! - `AuditLogger`: appends entries to the log file as JSON lines (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use bank::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Account,
//!     account.account_number.to_string(),
//!     Some(user.username.clone()),
//!     &account,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
