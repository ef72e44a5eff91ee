//! Authentication service
//!
//! Registration and login. Both end with the user's account provisioned and
//! an open [`Session`]; registration does not require a separate login.
//! The user row, the account and their audit entries commit together.

use rand::Rng;

use crate::audit::{EntityType, Operation};
use crate::config::settings::Settings;
use crate::crypto::{hash_password, verify_password, SecureString};
use crate::error::{BankError, BankResult};
use crate::models::{AccountNumber, NewUser, User, MINIMUM_AGE};
use crate::storage::{Storage, UnitOfWork};

use super::account::AccountService;

/// Raw sign-up input as typed at the prompts
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub age: String,
    pub password: SecureString,
    pub confirm_password: SecureString,
}

/// An authenticated user and their account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub account_number: AccountNumber,
}

/// Service for registration and login
pub struct AuthService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Register a new user and open a session for them
    pub fn register(&self, form: &Registration) -> BankResult<Session> {
        let first_name = required(&form.first_name, "First name")?;
        let last_name = required(&form.last_name, "Last name")?;
        let username = required(&form.username, "Username")?;

        let age = parse_age(&form.age)?;
        require_password(&form.password)?;

        let password = form.password.trimmed();
        if password != form.confirm_password.trimmed() {
            return Err(BankError::PasswordMismatch);
        }

        let password_hash = hash_password(&password, &self.settings.password_hashing)?;

        self.storage.unit_of_work(|uow| {
            let user = uow.users().insert(&NewUser {
                first_name,
                last_name,
                username,
                age,
                password_hash,
            })?;

            self.storage.log_create(
                EntityType::User,
                user.id.to_string(),
                Some(user.username.clone()),
                &user,
            )?;

            self.open_session(uow, user)
        })
    }

    /// Authenticate an existing user
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &SecureString) -> BankResult<Session> {
        let username = required(username, "Username")?;
        require_password(password)?;

        let user = self
            .storage
            .users()
            .get_by_username(&username)?
            .ok_or(BankError::InvalidCredentials)?;

        if !verify_password(&password.trimmed(), &user.password_hash)? {
            return Err(BankError::InvalidCredentials);
        }

        self.storage
            .unit_of_work(|uow| self.open_session(uow, user))
    }

    /// Close a session
    pub fn logout(&self, session: Session) -> BankResult<()> {
        self.storage.log_session(
            Operation::Logout,
            session.user.id.to_string(),
            &session.user.username,
        )
    }

    fn open_session(&self, uow: &UnitOfWork<'_>, user: User) -> BankResult<Session> {
        let mut rng = rand::thread_rng();
        let account_number = AccountService::new(self.storage, self.settings).provision_in(
            uow,
            user.id,
            |range| rng.gen_range(range),
        )?;

        self.storage
            .log_session(Operation::Login, user.id.to_string(), &user.username)?;

        Ok(Session {
            user,
            account_number,
        })
    }
}

/// Trimmed `value`, or a validation error naming `field` if it is blank
pub fn required(value: &str, field: &str) -> BankResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BankError::Validation(format!("{} cannot be blank.", field)));
    }
    Ok(value.to_string())
}

/// Parse an age and enforce the minimum
pub fn parse_age(input: &str) -> BankResult<i64> {
    let age: i64 = input
        .trim()
        .parse()
        .map_err(|_| BankError::Validation("Age must be a number.".into()))?;
    if age < MINIMUM_AGE {
        return Err(BankError::Underage {
            age,
            minimum: MINIMUM_AGE,
        });
    }
    Ok(age)
}

pub fn require_password(password: &SecureString) -> BankResult<()> {
    if password.is_blank() {
        return Err(BankError::Validation("Password cannot be blank.".into()));
    }
    Ok(())
}
