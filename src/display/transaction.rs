//! Transaction display formatting
//!
//! Renders a user's transaction history as a table, newest first.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;

use super::{banner, RULE};

/// Message shown when a user has no transactions
pub const NO_HISTORY: &str = "No transaction history available.";

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Recipient")]
    recipient: String,
}

/// Format the "Transaction History" view
pub fn format_transaction_history(
    transactions: &[Transaction],
    currency_symbol: &str,
    timestamp_format: &str,
) -> String {
    if transactions.is_empty() {
        return format!("{}\n", NO_HISTORY);
    }

    let rows = transactions.iter().map(|txn| HistoryRow {
        date: txn.timestamp.format(timestamp_format).to_string(),
        kind: txn.kind.to_string(),
        amount: txn.amount.format_with_symbol(currency_symbol),
        recipient: txn
            .recipient_account
            .map(|n| n.to_string())
            .unwrap_or_default(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let mut output = banner("Transaction History");
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(RULE);
    output
}
