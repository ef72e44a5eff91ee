//! Interactive menu shell
//!
//! Drives the main menu (sign up, log in, quit) and, once a session is open,
//! the banking menu. Errors the user can act on are printed and the menu is
//! shown again; anything else ends the shell and is returned to the caller.

pub mod prompt;

pub use prompt::{PasswordMode, Prompter};

use std::io::{BufRead, Write};

use crate::config::settings::Settings;
use crate::display::{
    banner, format_account_balance, format_account_details, format_transaction_history,
};
use crate::error::BankResult;
use crate::models::Money;
use crate::services::auth::{parse_age, require_password, required};
use crate::services::{
    parse_account_number, parse_amount, AuthService, LedgerService, Registration, Session,
};
use crate::storage::Storage;

const MAIN_MENU: &str = "
*************** Banking System ***************
1. Sign Up
2. Log In
3. Quit
";

const BANKING_MENU: &str = "1. View Account Details
2. View Account Balance
3. Deposit Money
4. Withdraw Money
5. Transfer Money
6. View Transaction History
7. Log Out
";

/// Whether the shell keeps going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input ran out
    Exit,
}

/// Read a line, or end the current step when input is exhausted
macro_rules! answer {
    ($self:ident . $method:ident ($prompt:expr)) => {
        match $self.prompt.$method($prompt)? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

/// Unwrap a result, or report a user-facing error and end the current step
macro_rules! check {
    ($self:ident, $result:expr) => {
        match $self.report($result)? {
            Some(value) => value,
            None => return Ok(Flow::Continue),
        }
    };
}

/// The interactive banking shell
pub struct Shell<'a, R, W> {
    storage: &'a Storage,
    settings: &'a Settings,
    prompt: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, prompt: Prompter<R, W>) -> Self {
        Self {
            storage,
            settings,
            prompt,
        }
    }

    /// Run the main menu until the user quits or input ends
    pub fn run(&mut self) -> BankResult<()> {
        loop {
            self.prompt.say(MAIN_MENU)?;
            let Some(choice) = self.prompt.ask("Choose an option from the menu above: ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.sign_up()?,
                "2" => self.log_in()?,
                "3" => break,
                _ => {
                    self.prompt
                        .say("Invalid choice, please select from the menu.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        self.prompt.say("Thanks for using FK'S BANK!")?;
        Ok(())
    }

    /// Give back the prompter's output sink
    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    fn auth(&self) -> AuthService<'a> {
        AuthService::new(self.storage, self.settings)
    }

    fn ledger(&self) -> LedgerService<'a> {
        LedgerService::new(self.storage)
    }

    /// Print user-facing errors; pass everything else up
    fn report<T>(&mut self, result: BankResult<T>) -> BankResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_user_facing() => {
                self.prompt.say(&e)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn sign_up(&mut self) -> BankResult<Flow> {
        self.prompt.say(banner("Sign Up").trim_end())?;

        let first_name = answer!(self.ask("Enter your first name: "));
        check!(self, required(&first_name, "First name"));
        let last_name = answer!(self.ask("Enter your last name: "));
        check!(self, required(&last_name, "Last name"));
        let username = answer!(self.ask("Enter your username: "));
        check!(self, required(&username, "Username"));
        let age = answer!(self.ask("Enter your age: "));
        check!(self, parse_age(&age));
        let password = answer!(self.ask_password("Enter your password: "));
        check!(self, require_password(&password));
        let confirm_password = answer!(self.ask_password("Confirm your password: "));

        let form = Registration {
            first_name,
            last_name,
            username,
            age,
            password,
            confirm_password,
        };
        let session = check!(self, self.auth().register(&form));

        self.prompt.say(format!(
            "User successfully registered! (Username: {})",
            session.user.username
        ))?;
        self.banking(session)
    }

    fn log_in(&mut self) -> BankResult<Flow> {
        self.prompt.say(banner("Log In").trim_end())?;

        let username = answer!(self.ask("Enter your username: "));
        check!(self, required(&username, "Username"));
        let password = answer!(self.ask_password("Enter your password: "));
        check!(self, require_password(&password));

        let session = check!(self, self.auth().login(&username, &password));
        self.banking(session)
    }

    fn banking(&mut self, session: Session) -> BankResult<Flow> {
        let outcome = self.banking_menu(&session);
        // Logout is recorded even when the menu ends on an error
        let logged_out = self.auth().logout(session);
        let flow = outcome?;
        logged_out?;
        Ok(flow)
    }

    fn banking_menu(&mut self, session: &Session) -> BankResult<Flow> {
        self.prompt.say(format!(
            "Log-in successful! Welcome, {}!",
            session.user.first_name
        ))?;

        loop {
            self.prompt.say(banner("Banking Menu").trim_end())?;
            self.prompt.print(BANKING_MENU)?;
            let Some(choice) = self.prompt.ask("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };

            let step = match choice.trim() {
                "1" => self.view_details(session)?,
                "2" => self.view_balance(session)?,
                "3" => self.deposit(session)?,
                "4" => self.withdraw(session)?,
                "5" => self.transfer(session)?,
                "6" => self.view_history(session)?,
                "7" => {
                    self.prompt.say("Logging out...")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    self.prompt.say("Invalid choice! Please try again.")?;
                    Flow::Continue
                }
            };
            if step == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn view_details(&mut self, session: &Session) -> BankResult<Flow> {
        let details = check!(self, self.ledger().account_details(session.user.id));
        self.prompt.print(&format_account_details(&details))?;
        Ok(Flow::Continue)
    }

    fn view_balance(&mut self, session: &Session) -> BankResult<Flow> {
        let account = check!(self, self.ledger().balance(session.user.id));
        self.prompt
            .print(&format_account_balance(&account, &self.settings.currency_symbol))?;
        Ok(Flow::Continue)
    }

    fn deposit(&mut self, session: &Session) -> BankResult<Flow> {
        let input = answer!(self.ask("Enter amount to deposit: "));
        let amount = check!(self, parse_amount(&input));
        let txn = check!(self, self.ledger().deposit(session.user.id, amount));

        let amount = self.money(txn.amount);
        self.prompt
            .say(format!("Successfully deposited {}.", amount))?;
        Ok(Flow::Continue)
    }

    fn withdraw(&mut self, session: &Session) -> BankResult<Flow> {
        let input = answer!(self.ask("Enter amount to withdraw: "));
        let amount = check!(self, parse_amount(&input));
        let txn = check!(self, self.ledger().withdraw(session.user.id, amount));

        let amount = self.money(txn.amount);
        self.prompt.say(format!("Successfully withdrew {}.", amount))?;
        Ok(Flow::Continue)
    }

    fn transfer(&mut self, session: &Session) -> BankResult<Flow> {
        let input = answer!(self.ask("Enter recipient's account number: "));
        let recipient = check!(self, parse_account_number(&input));
        let input = answer!(self.ask("Enter amount to transfer: "));
        let amount = check!(self, parse_amount(&input));
        let txn = check!(
            self,
            self.ledger().transfer(session.user.id, recipient, amount)
        );

        let amount = self.money(txn.amount);
        self.prompt.say(format!(
            "Successfully transferred {} to Account {}.",
            amount, recipient
        ))?;
        Ok(Flow::Continue)
    }

    fn view_history(&mut self, session: &Session) -> BankResult<Flow> {
        let history = check!(self, self.ledger().history(session.user.id));
        let output = format_transaction_history(
            &history,
            &self.settings.currency_symbol,
            &self.settings.timestamp_format,
        );
        self.prompt.print(&output)?;
        Ok(Flow::Continue)
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.settings.currency_symbol)
    }
}
