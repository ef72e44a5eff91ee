//! Account model
//!
//! Each user owns exactly one account, identified by a unique account number
//! and holding a balance that should never go negative.

use serde::{Deserialize, Serialize};

use super::ids::{AccountNumber, UserId};
use super::money::Money;

/// A bank account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: AccountNumber,
    pub user_id: UserId,
    pub balance: Money,
}

impl Account {
    /// A freshly provisioned, zero-balance account
    pub fn new(account_number: AccountNumber, user_id: UserId) -> Self {
        Self {
            account_number,
            user_id,
            balance: Money::zero(),
        }
    }

    /// Whether the balance covers `amount`
    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}

/// Owner and account number, as shown by "View Account Details"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetails {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub account_number: AccountNumber,
}

impl AccountDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
