//! Display formatting for terminal output
//!
//! Formats accounts, balances and transaction history as strings; the shell
//! decides where they are written.

pub mod account;
pub mod transaction;

pub use account::{format_account_balance, format_account_details};
pub use transaction::{format_transaction_history, NO_HISTORY};

const STARS: &str = "***************";

/// Closing rule printed under each view
pub(crate) const RULE: &str = "**************************************************\n";

/// Section heading in the "*** Title ***" style
pub fn banner(title: &str) -> String {
    format!("\n{} {} {}\n", STARS, title, STARS)
}
