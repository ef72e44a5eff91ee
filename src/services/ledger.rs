//! Ledger service
//!
//! Deposits, withdrawals and transfers for an authenticated user, plus the
//! read-only balance, details and history queries. Every mutation changes
//! balances and appends its transaction row in a single unit of work.

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{
    Account, AccountDetails, AccountNumber, Money, MoneyParseError, NewTransaction, Transaction,
    UserId,
};
use crate::storage::{Storage, UnitOfWork};

/// Parse an amount typed at a prompt
pub fn parse_amount(input: &str) -> BankResult<Money> {
    Money::parse(input).map_err(|e| match e {
        MoneyParseError::TooManyDecimals(_) | MoneyParseError::OutOfRange(_) => {
            BankError::Validation(e.to_string())
        }
        _ => BankError::Validation("Invalid input! Enter a valid number.".into()),
    })
}

/// Parse a recipient account number typed at a prompt
pub fn parse_account_number(input: &str) -> BankResult<AccountNumber> {
    input
        .parse()
        .map_err(|_| BankError::Validation("Invalid input! Enter valid numbers.".into()))
}

/// Service for balance-changing operations and account queries
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// Balances before and after a mutation, kept for the audit log
struct Change {
    before: Account,
    after: Account,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add money to the user's account
    pub fn deposit(&self, user_id: UserId, amount: Money) -> BankResult<Transaction> {
        require_positive(amount, "Deposit")?;

        self.storage.unit_of_work(|uow| {
            let before = account_of(uow, user_id)?;
            ensure_room(&before, amount)?;
            uow.accounts().adjust_balance(before.account_number, amount)?;
            let after = reload(uow, before.account_number)?;

            let txn = uow
                .transactions()
                .insert(&NewTransaction::deposit(user_id, amount))?;
            self.record(&[Change { before, after }], &txn)?;
            Ok(txn)
        })
    }

    /// Take money out of the user's account
    pub fn withdraw(&self, user_id: UserId, amount: Money) -> BankResult<Transaction> {
        require_positive(amount, "Withdrawal")?;

        self.storage.unit_of_work(|uow| {
            let before = account_of(uow, user_id)?;
            ensure_covers(&before, amount)?;

            uow.accounts()
                .adjust_balance(before.account_number, Money::zero() - amount)?;
            let after = reload(uow, before.account_number)?;

            let txn = uow
                .transactions()
                .insert(&NewTransaction::withdrawal(user_id, amount))?;
            self.record(&[Change { before, after }], &txn)?;
            Ok(txn)
        })
    }

    /// Move money from the user's account to another account
    ///
    /// One Transfer row is written, attributed to the sender and carrying the
    /// recipient's account number. Sending to your own account is a no-op on
    /// the balance but is still recorded.
    pub fn transfer(
        &self,
        user_id: UserId,
        recipient: AccountNumber,
        amount: Money,
    ) -> BankResult<Transaction> {
        require_positive(amount, "Transfer")?;

        self.storage.unit_of_work(|uow| {
            let sender = account_of(uow, user_id)?;
            ensure_covers(&sender, amount)?;

            let receiver = uow
                .accounts()
                .get(recipient)?
                .ok_or_else(|| BankError::NotFound {
                    entity_type: "Recipient account",
                    identifier: recipient.to_string(),
                })?;
            if receiver.account_number != sender.account_number {
                ensure_room(&receiver, amount)?;
            }

            uow.accounts()
                .adjust_balance(sender.account_number, Money::zero() - amount)?;
            uow.accounts().adjust_balance(recipient, amount)?;

            let mut changes = vec![Change {
                after: reload(uow, sender.account_number)?,
                before: sender,
            }];
            if receiver.account_number != changes[0].before.account_number {
                changes.push(Change {
                    after: reload(uow, recipient)?,
                    before: receiver,
                });
            }

            let txn = uow
                .transactions()
                .insert(&NewTransaction::transfer(user_id, amount, recipient))?;
            self.record(&changes, &txn)?;
            Ok(txn)
        })
    }

    /// The user's account with its current balance
    pub fn balance(&self, user_id: UserId) -> BankResult<Account> {
        self.storage
            .accounts()
            .get_by_user(user_id)?
            .ok_or_else(|| BankError::account_not_found(format!("user {}", user_id)))
    }

    /// Owner and account number for the user's account
    pub fn account_details(&self, user_id: UserId) -> BankResult<AccountDetails> {
        self.storage
            .accounts()
            .details(user_id)?
            .ok_or_else(|| BankError::account_not_found(format!("user {}", user_id)))
    }

    /// The user's transactions, newest first
    pub fn history(&self, user_id: UserId) -> BankResult<Vec<Transaction>> {
        self.storage.transactions().history(user_id)
    }

    /// Audit a mutation; runs inside its unit of work so a failed write
    /// rolls the mutation back
    fn record(&self, changes: &[Change], txn: &Transaction) -> BankResult<()> {
        for change in changes {
            self.storage.log_update(
                EntityType::Account,
                change.after.account_number.to_string(),
                None,
                &change.before,
                &change.after,
                Some(format!(
                    "balance: {} -> {}",
                    change.before.balance, change.after.balance
                )),
            )?;
        }

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.kind, txn.amount)),
            txn,
        )
    }
}

fn require_positive(amount: Money, what: &str) -> BankResult<()> {
    if !amount.is_positive() {
        return Err(BankError::Validation(format!(
            "{} amount must be greater than zero.",
            what
        )));
    }
    Ok(())
}

fn ensure_covers(account: &Account, amount: Money) -> BankResult<()> {
    if !account.can_cover(amount) {
        return Err(BankError::InsufficientFunds {
            needed: amount.to_string(),
            available: account.balance.to_string(),
        });
    }
    Ok(())
}

fn ensure_room(account: &Account, amount: Money) -> BankResult<()> {
    if account.balance.checked_add(amount).is_none() {
        return Err(BankError::Validation(format!(
            "Amount {} would exceed the maximum balance of account {}.",
            amount, account.account_number
        )));
    }
    Ok(())
}

fn account_of(uow: &UnitOfWork<'_>, user_id: UserId) -> BankResult<Account> {
    uow.accounts()
        .get_by_user(user_id)?
        .ok_or_else(|| BankError::account_not_found(format!("user {}", user_id)))
}

fn reload(uow: &UnitOfWork<'_>, number: AccountNumber) -> BankResult<Account> {
    uow.accounts()
        .get(number)?
        .ok_or_else(|| BankError::account_not_found(number.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::config::settings::Settings;
    use crate::models::{NewUser, TransactionKind};
    use crate::services::AccountService;
    use tempfile::TempDir;

    fn add_customer(storage: &Storage, username: &str, number: u32) -> UserId {
        let user = storage
            .users()
            .insert(&NewUser {
                first_name: username.to_uppercase(),
                last_name: "Test".into(),
                username: username.into(),
                age: 30,
                password_hash: "h".into(),
            })
            .unwrap();
        AccountService::new(storage, &Settings::default())
            .provision_account_with(user.id, |_| number)
            .unwrap();
        user.id
    }

    fn dollars(amount: i64) -> Money {
        Money::from_dollars_cents(amount, 0)
    }

    fn balance_of(storage: &Storage, user_id: UserId) -> Money {
        LedgerService::new(storage).balance(user_id).unwrap().balance
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let ledger = LedgerService::new(&storage);

        let deposit = ledger.deposit(alice, dollars(100)).unwrap();
        assert_eq!(deposit.kind, TransactionKind::Deposit);
        assert_eq!(balance_of(&storage, alice), dollars(100));

        let withdrawal = ledger.withdraw(alice, Money::from_cents(2550)).unwrap();
        assert_eq!(withdrawal.kind, TransactionKind::Withdrawal);
        assert_eq!(withdrawal.recipient_account, None);
        assert_eq!(balance_of(&storage, alice), Money::from_cents(7450));
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let ledger = LedgerService::new(&storage);

        ledger.deposit(alice, dollars(50)).unwrap();
        ledger.withdraw(alice, dollars(50)).unwrap();

        assert!(balance_of(&storage, alice).is_zero());
    }

    #[test]
    fn test_guard_rails_change_nothing() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let bob = add_customer(&storage, "bob", 222_222);
        let ledger = LedgerService::new(&storage);
        ledger.deposit(alice, dollars(10)).unwrap();

        let err = ledger.deposit(alice, Money::zero()).unwrap_err();
        assert_eq!(err.to_string(), "Deposit amount must be greater than zero.");
        let err = ledger.withdraw(alice, Money::from_cents(-100)).unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal amount must be greater than zero.");
        let err = ledger
            .transfer(alice, AccountNumber::new(222_222), Money::zero())
            .unwrap_err();
        assert_eq!(err.to_string(), "Transfer amount must be greater than zero.");

        assert!(matches!(
            ledger.withdraw(alice, Money::from_cents(1001)),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            ledger.transfer(alice, AccountNumber::new(222_222), dollars(11)),
            Err(BankError::InsufficientFunds { .. })
        ));

        let unknown = ledger
            .transfer(alice, AccountNumber::new(999_999), dollars(1))
            .unwrap_err();
        assert!(unknown.is_not_found());
        assert!(unknown.is_user_facing());

        assert_eq!(balance_of(&storage, alice), dollars(10));
        assert!(balance_of(&storage, bob).is_zero());
        assert_eq!(storage.transactions().count().unwrap(), 1);
    }

    #[test]
    fn test_transfer_conserves_money() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let bob = add_customer(&storage, "bob", 222_222);
        let ledger = LedgerService::new(&storage);
        ledger.deposit(alice, Money::from_cents(12_345)).unwrap();
        ledger.deposit(bob, Money::from_cents(500)).unwrap();

        let txn = ledger
            .transfer(alice, AccountNumber::new(222_222), Money::from_cents(2_345))
            .unwrap();

        assert_eq!(balance_of(&storage, alice), Money::from_cents(10_000));
        assert_eq!(balance_of(&storage, bob), Money::from_cents(2_845));
        assert_eq!(txn.kind, TransactionKind::Transfer);
        assert_eq!(txn.user_id, alice);
        assert_eq!(txn.recipient_account, Some(AccountNumber::new(222_222)));

        // One row for the sender, none for the recipient
        assert_eq!(storage.transactions().count_for_user(alice).unwrap(), 2);
        assert_eq!(storage.transactions().count_for_user(bob).unwrap(), 1);
    }

    #[test]
    fn test_transfer_to_self() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let ledger = LedgerService::new(&storage);
        ledger.deposit(alice, dollars(20)).unwrap();

        ledger
            .transfer(alice, AccountNumber::new(111_111), dollars(5))
            .unwrap();

        assert_eq!(balance_of(&storage, alice), dollars(20));
        assert_eq!(storage.transactions().count_for_user(alice).unwrap(), 2);
    }

    #[test]
    fn test_no_account_is_not_found() {
        let storage = Storage::open_in_memory().unwrap();
        let user = storage
            .users()
            .insert(&NewUser {
                first_name: "No".into(),
                last_name: "Account".into(),
                username: "noacct".into(),
                age: 30,
                password_hash: "h".into(),
            })
            .unwrap();
        let ledger = LedgerService::new(&storage);

        assert!(ledger.balance(user.id).unwrap_err().is_not_found());
        assert!(ledger.account_details(user.id).unwrap_err().is_not_found());
        assert!(ledger.deposit(user.id, dollars(1)).unwrap_err().is_not_found());
        assert!(ledger.history(user.id).unwrap().is_empty());
        assert_eq!(storage.accounts().count().unwrap(), 0);
    }

    #[test]
    fn test_account_details() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);

        let details = LedgerService::new(&storage).account_details(alice).unwrap();

        assert_eq!(details.username, "alice");
        assert_eq!(details.full_name(), "ALICE Test");
        assert_eq!(details.account_number, AccountNumber::new(111_111));
    }

    #[test]
    fn test_alice_and_bob() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let bob = add_customer(&storage, "bob", 222_222);
        let ledger = LedgerService::new(&storage);

        ledger.deposit(alice, dollars(100)).unwrap();
        ledger
            .transfer(alice, AccountNumber::new(222_222), dollars(40))
            .unwrap();
        assert!(matches!(
            ledger.withdraw(bob, dollars(50)),
            Err(BankError::InsufficientFunds { .. })
        ));
        ledger.withdraw(bob, dollars(40)).unwrap();

        assert_eq!(balance_of(&storage, alice), dollars(60));
        assert!(balance_of(&storage, bob).is_zero());

        let alice_kinds: Vec<_> = ledger
            .history(alice)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            alice_kinds,
            vec![TransactionKind::Transfer, TransactionKind::Deposit]
        );

        let bob_history = ledger.history(bob).unwrap();
        assert_eq!(bob_history.len(), 1);
        assert_eq!(bob_history[0].kind, TransactionKind::Withdrawal);
        assert_eq!(bob_history[0].amount, dollars(40));
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open_at(
            &temp_dir.path().join("bank.db"),
            AuditLogger::new(temp_dir.path().join("audit.log")),
        )
        .unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let bob = add_customer(&storage, "bob", 222_222);
        let ledger = LedgerService::new(&storage);
        let before = storage.audit().read_all().unwrap().len();

        ledger.deposit(alice, dollars(10)).unwrap();
        ledger
            .transfer(alice, AccountNumber::new(222_222), dollars(4))
            .unwrap();
        let _ = ledger.withdraw(bob, dollars(100));

        let entries = storage.audit().read_all().unwrap();
        let new: Vec<_> = entries[before..]
            .iter()
            .map(|e| (e.operation, e.entity_type, e.entity_id.clone()))
            .collect();
        assert_eq!(
            new,
            vec![
                (Operation::Update, EntityType::Account, "111111".to_string()),
                (Operation::Create, EntityType::Transaction, "1".to_string()),
                (Operation::Update, EntityType::Account, "111111".to_string()),
                (Operation::Update, EntityType::Account, "222222".to_string()),
                (Operation::Create, EntityType::Transaction, "2".to_string()),
            ]
        );
        assert_eq!(
            entries[before].diff_summary.as_deref(),
            Some("balance: $0.00 -> $10.00")
        );
    }

    #[test]
    fn test_deposit_beyond_maximum_balance() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let ledger = LedgerService::new(&storage);
        ledger.deposit(alice, parse_amount("92233720368547758.07").unwrap()).unwrap();

        let err = ledger.deposit(alice, Money::from_cents(1)).unwrap_err();

        assert!(err.is_validation());
        assert!(err.is_user_facing());
        assert_eq!(balance_of(&storage, alice), Money::from_cents(i64::MAX));
        assert_eq!(storage.transactions().count().unwrap(), 1);
        // Balance still reads back as an integer
        assert_eq!(ledger.history(alice).unwrap().len(), 1);
    }

    #[test]
    fn test_transfer_beyond_recipient_maximum() {
        let storage = Storage::open_in_memory().unwrap();
        let alice = add_customer(&storage, "alice", 111_111);
        let bob = add_customer(&storage, "bob", 222_222);
        let ledger = LedgerService::new(&storage);
        ledger.deposit(alice, dollars(10)).unwrap();
        ledger.deposit(bob, Money::from_cents(i64::MAX)).unwrap();

        let err = ledger
            .transfer(alice, AccountNumber::new(222_222), dollars(1))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(balance_of(&storage, alice), dollars(10));
        assert_eq!(balance_of(&storage, bob), Money::from_cents(i64::MAX));
        assert_eq!(storage.transactions().count().unwrap(), 2);

        // A full account can still send to itself
        ledger
            .transfer(bob, AccountNumber::new(222_222), dollars(1))
            .unwrap();
        assert_eq!(balance_of(&storage, bob), Money::from_cents(i64::MAX));
    }

    /// Seed a customer through the repositories, which write no audit entries
    fn seed_customer(storage: &Storage, username: &str, number: u32, cents: i64) -> UserId {
        let user = storage
            .users()
            .insert(&NewUser {
                first_name: username.to_uppercase(),
                last_name: "Test".into(),
                username: username.into(),
                age: 30,
                password_hash: "h".into(),
            })
            .unwrap();
        let number = AccountNumber::new(number);
        storage.accounts().insert(&Account::new(number, user.id)).unwrap();
        storage
            .accounts()
            .adjust_balance(number, Money::from_cents(cents))
            .unwrap();
        user.id
    }

    #[test]
    fn test_failed_audit_write_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let storage = Storage::open_at(
            &temp_dir.path().join("bank.db"),
            AuditLogger::new(temp_dir.path().to_path_buf()),
        )
        .unwrap();
        let alice = seed_customer(&storage, "alice", 111_111, 1_000);
        let bob = seed_customer(&storage, "bob", 222_222, 0);
        let ledger = LedgerService::new(&storage);

        assert!(matches!(
            ledger.deposit(alice, dollars(5)),
            Err(BankError::Io(_))
        ));
        assert!(matches!(
            ledger.withdraw(alice, dollars(5)),
            Err(BankError::Io(_))
        ));
        assert!(matches!(
            ledger.transfer(alice, AccountNumber::new(222_222), dollars(5)),
            Err(BankError::Io(_))
        ));

        assert_eq!(balance_of(&storage, alice), dollars(10));
        assert!(balance_of(&storage, bob).is_zero());
        assert_eq!(storage.transactions().count().unwrap(), 0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5").unwrap(), Money::from_cents(1250));
        assert_eq!(parse_amount(" 7 ").unwrap(), dollars(7));

        let err = parse_amount("abc").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid input! Enter a valid number.");
        assert!(parse_amount("").unwrap_err().is_validation());
        assert!(parse_amount("1.234").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_account_number() {
        assert_eq!(
            parse_account_number(" 222222 ").unwrap(),
            AccountNumber::new(222_222)
        );
        assert!(parse_account_number("twelve").unwrap_err().is_validation());
        assert!(parse_account_number("-5").unwrap_err().is_validation());
    }
}
