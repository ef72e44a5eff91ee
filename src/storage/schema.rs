//! Database schema
//!
//! Created idempotently on every startup. Amounts are INTEGER cents.
//! `accounts.user_id` is UNIQUE so a user can never own two accounts.

use rusqlite::Connection;

use crate::error::BankResult;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    age INTEGER NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    account_num INTEGER PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL UNIQUE,
    balance_cents INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('Deposit', 'Withdrawal', 'Transfer')),
    amount_cents INTEGER NOT NULL,
    recipient_account INTEGER,
    timestamp TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_time
    ON transactions (user_id, timestamp);
";

/// Enable foreign keys and create any missing tables
pub fn initialize(conn: &Connection) -> BankResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
