//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up user ids, account
//! numbers and transaction ids at compile time. Each wrapper is stored in
//! SQLite as a plain INTEGER.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate integer ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw value
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Get the raw value
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                <$inner>::column_result(value).map(Self)
            }
        }
    };
}

define_id!(UserId, i64);
define_id!(TransactionId, i64);
define_id!(AccountNumber, u32);

impl AccountNumber {
    /// Number of decimal digits
    pub fn digits(&self) -> u32 {
        self.0.checked_ilog10().map_or(1, |d| d + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(AccountNumber::new(123456).to_string(), "123456");
    }

    #[test]
    fn test_account_number_parse() {
        assert_eq!("123456".parse::<AccountNumber>().unwrap(), AccountNumber::new(123456));
        assert_eq!(" 654321 ".parse::<AccountNumber>().unwrap(), AccountNumber::new(654321));
        assert!("abc".parse::<AccountNumber>().is_err());
        assert!("-5".parse::<AccountNumber>().is_err());
        assert!("".parse::<AccountNumber>().is_err());
    }

    #[test]
    fn test_account_number_digits() {
        assert_eq!(AccountNumber::new(100000).digits(), 6);
        assert_eq!(AccountNumber::new(999999).digits(), 6);
        assert_eq!(AccountNumber::new(1000000).digits(), 7);
        assert_eq!(AccountNumber::new(0).digits(), 1);
    }

    #[test]
    fn test_id_serialization() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_sql_round_trip() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let n: AccountNumber = conn
            .query_row("SELECT ?1", [AccountNumber::new(555555)], |row| row.get(0))
            .unwrap();
        assert_eq!(n, AccountNumber::new(555555));
    }
}
