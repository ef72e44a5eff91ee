//! User model
//!
//! A registered bank customer. Users are created at sign-up and never
//! modified or deleted afterwards.

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Minimum age to open an account
pub const MINIMUM_AGE: i64 = 18;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub age: i64,

    /// Argon2 PHC string; never serialized into audit snapshots
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user row that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub age: i64,
    pub password_hash: String,
}
