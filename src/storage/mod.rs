//! Storage layer for FK's Bank
//!
//! Owns the single SQLite connection for the lifetime of the process and
//! hands out short-lived repositories over it. Multi-row writes go through
//! [`Storage::unit_of_work`], which commits everything or nothing.

pub mod accounts;
pub mod schema;
pub mod transactions;
pub mod users;

pub use accounts::AccountRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::paths::BankPaths;
use crate::error::{BankError, BankResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    conn: Connection,
    audit: AuditLogger,
}

/// Repositories bound to an open database transaction
pub struct UnitOfWork<'s> {
    tx: rusqlite::Transaction<'s>,
}

impl UnitOfWork<'_> {
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.tx)
    }

    pub fn accounts(&self) -> AccountRepository<'_> {
        AccountRepository::new(&self.tx)
    }

    pub fn transactions(&self) -> TransactionRepository<'_> {
        TransactionRepository::new(&self.tx)
    }
}

impl Storage {
    /// Open (creating if needed) the database under the data directory
    pub fn open(paths: &BankPaths) -> BankResult<Self> {
        paths.ensure_directories()?;
        Self::open_at(&paths.database_file(), AuditLogger::new(paths.audit_log()))
    }

    /// Open a database file with an explicit audit logger
    pub fn open_at(db_path: &Path, audit: AuditLogger) -> BankResult<Self> {
        let conn = Connection::open(db_path).map_err(|e| {
            BankError::Database(format!("Failed to open {}: {}", db_path.display(), e))
        })?;
        Self::from_connection(conn, audit)
    }

    /// A private in-memory database without audit logging (tests)
    pub fn open_in_memory() -> BankResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, AuditLogger::disabled())
    }

    fn from_connection(conn: Connection, audit: AuditLogger) -> BankResult<Self> {
        schema::initialize(&conn)?;
        Ok(Self { conn, audit })
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.conn)
    }

    pub fn accounts(&self) -> AccountRepository<'_> {
        AccountRepository::new(&self.conn)
    }

    pub fn transactions(&self) -> TransactionRepository<'_> {
        TransactionRepository::new(&self.conn)
    }

    /// Run `work` inside one database transaction
    ///
    /// Commits if `work` returns `Ok`, rolls back otherwise. Not reentrant.
    pub fn unit_of_work<T, F>(&self, work: F) -> BankResult<T>
    where
        F: FnOnce(&UnitOfWork<'_>) -> BankResult<T>,
    {
        let uow = UnitOfWork {
            tx: self.conn.unchecked_transaction()?,
        };

        let value = work(&uow)?;
        uow.tx.commit()?;
        Ok(value)
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record the creation of an entity
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BankResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a change to an entity
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> BankResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Record a login or logout
    pub fn log_session(
        &self,
        operation: Operation,
        user_id: impl Into<String>,
        username: &str,
    ) -> BankResult<()> {
        self.audit
            .log(&AuditEntry::session(operation, user_id, username))
    }

    /// Close the connection, reporting any error SQLite raises on close
    pub fn close(self) -> BankResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| BankError::Database(format!("Failed to close database: {}", e)))
    }
}
