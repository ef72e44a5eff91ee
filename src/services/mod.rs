//! Service layer for FK's Bank
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, account provisioning, and atomic ledger operations.

pub mod account;
pub mod auth;
pub mod ledger;

pub use account::AccountService;
pub use auth::{AuthService, Registration, Session};
pub use ledger::{parse_account_number, parse_amount, LedgerService};
