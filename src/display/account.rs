//! Account display formatting
//!
//! Formats account details and balances for terminal output.

use crate::models::{Account, AccountDetails};

use super::{banner, RULE};

/// Format the "Account Details" view
pub fn format_account_details(details: &AccountDetails) -> String {
    let mut output = banner("Account Details");
    output.push_str(&format!("Full Name: {}\n", details.full_name()));
    output.push_str(&format!("Username: {}\n", details.username));
    output.push_str(&format!("Account Number: {}\n", details.account_number));
    output.push_str(RULE);
    output
}

/// Format the "Account Balance" view
pub fn format_account_balance(account: &Account, currency_symbol: &str) -> String {
    let mut output = banner("Account Balance");
    output.push_str(&format!("Account Number: {}\n", account.account_number));
    output.push_str(&format!(
        "Balance: {}\n",
        account.balance.format_with_symbol(currency_symbol)
    ));
    output.push_str(RULE);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountNumber, Money, UserId};

    #[test]
    fn test_format_account_details() {
        let details = AccountDetails {
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            username: "alice".into(),
            account_number: AccountNumber::new(123456),
        };

        let output = format_account_details(&details);
        assert!(output.contains("*************** Account Details ***************"));
        assert!(output.contains("Full Name: Alice Smith"));
        assert!(output.contains("Username: alice"));
        assert!(output.contains("Account Number: 123456"));
    }

    #[test]
    fn test_format_account_balance() {
        let account = Account {
            account_number: AccountNumber::new(654321),
            user_id: UserId::new(1),
            balance: Money::from_cents(6000),
        };

        let output = format_account_balance(&account, "$");
        assert!(output.contains("Account Number: 654321"));
        assert!(output.contains("Balance: $60.00"));

        let output = format_account_balance(&account, "€");
        assert!(output.contains("Balance: €60.00"));
    }
}
