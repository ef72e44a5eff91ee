//! Transaction model
//!
//! An immutable, append-only record of a ledger operation. A transfer is a
//! single row attributed to the sender that carries the recipient's account
//! number; the recipient gets no row of its own.

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ids::{AccountNumber, TransactionId, UserId};
use super::money::Money;

/// Kind of ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    /// The value stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
            Self::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transaction type: {0}")]
pub struct UnknownTransactionKind(String);

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deposit" => Ok(Self::Deposit),
            "Withdrawal" => Ok(Self::Withdrawal),
            "Transfer" => Ok(Self::Transfer),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A recorded ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub recipient_account: Option<AccountNumber>,
    pub timestamp: DateTime<Utc>,
}

/// A transaction row that has not been inserted yet
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub recipient_account: Option<AccountNumber>,
    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    pub fn deposit(user_id: UserId, amount: Money) -> Self {
        Self::now(user_id, TransactionKind::Deposit, amount, None)
    }

    pub fn withdrawal(user_id: UserId, amount: Money) -> Self {
        Self::now(user_id, TransactionKind::Withdrawal, amount, None)
    }

    pub fn transfer(user_id: UserId, amount: Money, recipient: AccountNumber) -> Self {
        Self::now(user_id, TransactionKind::Transfer, amount, Some(recipient))
    }

    fn now(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        recipient_account: Option<AccountNumber>,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            recipient_account,
            timestamp: Utc::now(),
        }
    }

    /// Override the timestamp (imports, tests)
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Transfer,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert!("Refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_transfer_carries_recipient() {
        let txn = NewTransaction::transfer(UserId::new(1), Money::from_cents(4000), AccountNumber::new(222222));
        assert_eq!(txn.kind, TransactionKind::Transfer);
        assert_eq!(txn.recipient_account, Some(AccountNumber::new(222222)));

        let deposit = NewTransaction::deposit(UserId::new(1), Money::from_cents(100));
        assert_eq!(deposit.recipient_account, None);
    }

    #[test]
    fn test_kind_from_sql_rejects_unknown() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let kind: TransactionKind = conn
            .query_row("SELECT 'Withdrawal'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(kind, TransactionKind::Withdrawal);

        let bad: rusqlite::Result<TransactionKind> =
            conn.query_row("SELECT 'Refund'", [], |row| row.get(0));
        assert!(bad.is_err());
    }
}
