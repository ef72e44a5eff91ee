//! Account repository

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountDetails, AccountNumber, Money, UserId};

/// Repository for account persistence
pub struct AccountRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AccountRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a new account
    ///
    /// Fails with `Duplicate` if the number is taken or the user already
    /// owns an account.
    pub fn insert(&self, account: &Account) -> BankResult<()> {
        let result = self.conn.execute(
            "INSERT INTO accounts (account_num, user_id, balance_cents) VALUES (?1, ?2, ?3)",
            params![account.account_number, account.user_id, account.balance],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(BankError::Duplicate {
                    entity_type: "Account",
                    identifier: format!(
                        "number {} or owner {}",
                        account.account_number, account.user_id
                    ),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an account by number
    pub fn get(&self, number: AccountNumber) -> BankResult<Option<Account>> {
        let account = self
            .conn
            .query_row(
                "SELECT account_num, user_id, balance_cents FROM accounts WHERE account_num = ?1",
                [number],
                map_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Get the account owned by a user
    pub fn get_by_user(&self, user_id: UserId) -> BankResult<Option<Account>> {
        let account = self
            .conn
            .query_row(
                "SELECT account_num, user_id, balance_cents FROM accounts WHERE user_id = ?1",
                [user_id],
                map_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Check if an account number is already taken
    pub fn number_exists(&self, number: AccountNumber) -> BankResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE account_num = ?1)",
            [number],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Add `delta` (which may be negative) to an account's balance
    pub fn adjust_balance(&self, number: AccountNumber, delta: Money) -> BankResult<()> {
        let updated = self.conn.execute(
            "UPDATE accounts SET balance_cents = balance_cents + ?1 WHERE account_num = ?2",
            params![delta, number],
        )?;

        if updated == 0 {
            return Err(BankError::account_not_found(number.to_string()));
        }
        Ok(())
    }

    /// Owner name, username and account number for a user
    pub fn details(&self, user_id: UserId) -> BankResult<Option<AccountDetails>> {
        let details = self
            .conn
            .query_row(
                "SELECT users.first_name, users.last_name, users.username, accounts.account_num
                 FROM users JOIN accounts ON users.id = accounts.user_id
                 WHERE users.id = ?1",
                [user_id],
                |row| {
                    Ok(AccountDetails {
                        first_name: row.get(0)?,
                        last_name: row.get(1)?,
                        username: row.get(2)?,
                        account_number: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(details)
    }

    /// Count accounts
    pub fn count(&self) -> BankResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn map_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        account_number: row.get(0)?,
        user_id: row.get(1)?,
        balance: row.get(2)?,
    })
}
