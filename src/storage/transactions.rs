//! Transaction repository
//!
//! Rows are only ever inserted. Timestamps are stored as fixed-width
//! RFC 3339 UTC strings so that text ordering matches time ordering.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::BankResult;
use crate::models::{NewTransaction, Transaction, TransactionId, UserId};

/// Repository for the transaction log
pub struct TransactionRepository<'c> {
    conn: &'c Connection,
}

impl<'c> TransactionRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append a transaction
    pub fn insert(&self, txn: &NewTransaction) -> BankResult<Transaction> {
        self.conn.execute(
            "INSERT INTO transactions (user_id, type, amount_cents, recipient_account, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.user_id,
                txn.kind,
                txn.amount,
                txn.recipient_account,
                encode_timestamp(&txn.timestamp)
            ],
        )?;

        Ok(Transaction {
            id: TransactionId::new(self.conn.last_insert_rowid()),
            user_id: txn.user_id,
            kind: txn.kind,
            amount: txn.amount,
            recipient_account: txn.recipient_account,
            timestamp: txn.timestamp.trunc_subsecs(6),
        })
    }

    /// All transactions for a user, newest first
    pub fn history(&self, user_id: UserId) -> BankResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, type, amount_cents, recipient_account, timestamp
             FROM transactions
             WHERE user_id = ?1
             ORDER BY timestamp DESC, id DESC",
        )?;

        let transactions = stmt
            .query_map([user_id], map_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Count a user's transactions
    pub fn count_for_user(&self, user_id: UserId) -> BankResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Count every transaction in the log
    pub fn count(&self) -> BankResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        recipient_account: row.get(4)?,
        timestamp: decode_timestamp(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountNumber, Money, NewUser, TransactionKind};
    use crate::storage::schema;
    use crate::storage::users::UserRepository;
    use chrono::TimeZone;

    fn create_test_conn() -> (Connection, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        let user = UserRepository::new(&conn)
            .insert(&NewUser {
                first_name: "Alice".into(),
                last_name: "Smith".into(),
                username: "alice".into(),
                age: 25,
                password_hash: "h".into(),
            })
            .unwrap();
        (conn, user.id)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_insert_and_read_back() {
        let (conn, user_id) = create_test_conn();
        let repo = TransactionRepository::new(&conn);

        let stored = repo
            .insert(
                &NewTransaction::transfer(user_id, Money::from_cents(4000), AccountNumber::new(222222))
                    .at(at(9)),
            )
            .unwrap();

        let history = repo.history(user_id).unwrap();
        assert_eq!(history, vec![stored]);
        assert_eq!(history[0].kind, TransactionKind::Transfer);
        assert_eq!(history[0].recipient_account, Some(AccountNumber::new(222222)));
        assert_eq!(history[0].timestamp, at(9));
    }

    #[test]
    fn test_history_newest_first() {
        let (conn, user_id) = create_test_conn();
        let repo = TransactionRepository::new(&conn);

        // Inserted out of order on purpose
        repo.insert(&NewTransaction::deposit(user_id, Money::from_cents(200)).at(at(12)))
            .unwrap();
        repo.insert(&NewTransaction::deposit(user_id, Money::from_cents(100)).at(at(10)))
            .unwrap();
        repo.insert(&NewTransaction::withdrawal(user_id, Money::from_cents(300)).at(at(14)))
            .unwrap();

        let times: Vec<_> = repo
            .history(user_id)
            .unwrap()
            .into_iter()
            .map(|t| t.timestamp)
            .collect();
        assert_eq!(times, vec![at(14), at(12), at(10)]);
    }

    #[test]
    fn test_history_ties_broken_by_insertion_order() {
        let (conn, user_id) = create_test_conn();
        let repo = TransactionRepository::new(&conn);

        let first = repo
            .insert(&NewTransaction::deposit(user_id, Money::from_cents(1)).at(at(8)))
            .unwrap();
        let second = repo
            .insert(&NewTransaction::deposit(user_id, Money::from_cents(2)).at(at(8)))
            .unwrap();

        let ids: Vec<_> = repo.history(user_id).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_counts() {
        let (conn, user_id) = create_test_conn();
        let repo = TransactionRepository::new(&conn);
        assert_eq!(repo.count_for_user(user_id).unwrap(), 0);

        repo.insert(&NewTransaction::deposit(user_id, Money::from_cents(1))).unwrap();

        assert_eq!(repo.count_for_user(user_id).unwrap(), 1);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.count_for_user(UserId::new(99)).unwrap(), 0);
    }
}
