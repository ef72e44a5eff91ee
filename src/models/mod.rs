//! Core data models for FK's Bank
//!
//! Users, their single account, and the append-only transaction log.

pub mod account;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountDetails};
pub use ids::{AccountNumber, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
pub use user::{NewUser, User, MINIMUM_AGE};
