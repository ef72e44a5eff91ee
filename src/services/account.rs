//! Account service
//!
//! Allocates account numbers and provisions the single account each user
//! owns. Provisioning is idempotent: a user who already has an account gets
//! its number back and nothing is written.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountNumber, UserId};
use crate::storage::{AccountRepository, Storage, UnitOfWork};

/// Number spaces tried in order: six digits, then seven
const NUMBER_SPACES: [RangeInclusive<u32>; 2] = [100_000..=999_999, 1_000_000..=9_999_999];

/// Service for account provisioning
pub struct AccountService<'a> {
    storage: &'a Storage,
    max_attempts: u32,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            max_attempts: settings.account_numbers.max_attempts.max(1),
        }
    }

    /// Pick an unused account number at random
    pub fn generate_account_number(&self) -> BankResult<AccountNumber> {
        let mut rng = rand::thread_rng();
        self.generate_account_number_with(|range| rng.gen_range(range))
    }

    /// Pick an unused account number, drawing candidates from `pick`
    pub fn generate_account_number_with<F>(&self, pick: F) -> BankResult<AccountNumber>
    where
        F: FnMut(RangeInclusive<u32>) -> u32,
    {
        allocate(&self.storage.accounts(), self.max_attempts, pick)
    }

    /// Return the user's account number, creating a zero-balance account first
    /// if the user has none
    pub fn provision_account(&self, user_id: UserId) -> BankResult<AccountNumber> {
        let mut rng = rand::thread_rng();
        self.provision_account_with(user_id, |range| rng.gen_range(range))
    }

    /// [`provision_account`](Self::provision_account) with an explicit
    /// candidate source
    pub fn provision_account_with<F>(&self, user_id: UserId, pick: F) -> BankResult<AccountNumber>
    where
        F: FnMut(RangeInclusive<u32>) -> u32,
    {
        self.storage
            .unit_of_work(|uow| self.provision_in(uow, user_id, pick))
    }

    /// Provision inside an open unit of work
    ///
    /// The audit entry for a new account is written before the caller
    /// commits, so a failed write leaves no account behind.
    pub(crate) fn provision_in<F>(
        &self,
        uow: &UnitOfWork<'_>,
        user_id: UserId,
        pick: F,
    ) -> BankResult<AccountNumber>
    where
        F: FnMut(RangeInclusive<u32>) -> u32,
    {
        let owner = uow
            .users()
            .get(user_id)?
            .ok_or_else(|| BankError::user_not_found(user_id.to_string()))?;

        if let Some(existing) = uow.accounts().get_by_user(user_id)? {
            return Ok(existing.account_number);
        }

        let number = allocate(&uow.accounts(), self.max_attempts, pick)?;
        let account = Account::new(number, user_id);
        uow.accounts().insert(&account)?;

        self.storage.log_create(
            EntityType::Account,
            number.to_string(),
            Some(owner.username),
            &account,
        )?;
        Ok(number)
    }
}

/// Draw candidates until one is free, widening the number space when the
/// current one keeps colliding
fn allocate<F>(
    accounts: &AccountRepository<'_>,
    max_attempts: u32,
    mut pick: F,
) -> BankResult<AccountNumber>
where
    F: FnMut(RangeInclusive<u32>) -> u32,
{
    for space in NUMBER_SPACES.iter() {
        for _ in 0..max_attempts {
            let candidate = AccountNumber::new(pick(space.clone()));
            if space.contains(&candidate.get()) && !accounts.number_exists(candidate)? {
                return Ok(candidate);
            }
        }
    }

    Err(BankError::AccountNumberExhausted {
        attempts: max_attempts * NUMBER_SPACES.len() as u32,
    })
}
