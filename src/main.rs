use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bank::audit::AuditLogger;
use bank::config::{paths::BankPaths, settings::Settings};
use bank::shell::{PasswordMode, Prompter, Shell};
use bank::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fk-bank",
    version,
    about = "Terminal banking ledger",
    long_about = "FK's Bank is a terminal banking ledger. Register, log in, and \
                  deposit, withdraw and transfer money between accounts, with \
                  every transaction kept in a local SQLite database."
)]
struct Cli {
    /// Directory holding the database, settings and audit log
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration and paths
    Config,

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BankPaths::resolve(cli.data_dir)?;
    let settings = Settings::load_or_create(&paths).context("Failed to load settings")?;

    match cli.command {
        Some(Commands::Config) => {
            print_config(&paths, &settings);
            Ok(())
        }
        Some(Commands::Audit { limit }) => print_audit(&paths, limit),
        None => run_shell(&paths, &settings),
    }
}

fn run_shell(paths: &BankPaths, settings: &Settings) -> Result<()> {
    let storage = Storage::open(paths).with_context(|| {
        format!(
            "Failed to open database at {}",
            paths.database_file().display()
        )
    })?;
    if !paths.settings_file().exists() {
        settings.save(paths).context("Failed to write default settings")?;
    }

    let passwords = if io::stdin().is_terminal() {
        PasswordMode::Hidden
    } else {
        PasswordMode::Inline
    };
    let prompt = Prompter::new(io::stdin().lock(), io::stdout(), passwords);
    let outcome = Shell::new(&storage, settings, prompt).run();

    if let Err(e) = &outcome {
        println!("Something went wrong: {}", e);
    }
    println!("Closing database connection.");
    storage.close().context("Failed to close database")?;

    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_audit(paths: &BankPaths, limit: usize) -> Result<()> {
    let entries = AuditLogger::new(paths.audit_log())
        .read_recent(limit)
        .context("Failed to read audit log")?;

    if entries.is_empty() {
        println!("No audit entries.");
    }
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}

fn print_config(paths: &BankPaths, settings: &Settings) {
    println!("FK's Bank Configuration");
    println!("=======================");
    println!("Data directory: {}", paths.base_dir().display());
    println!("Database:       {}", paths.database_file().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Audit log:      {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:      {}", settings.currency_symbol);
    println!("  Timestamp format:     {}", settings.timestamp_format);
    println!(
        "  Account number tries: {}",
        settings.account_numbers.max_attempts
    );
    println!(
        "  Argon2 cost:          m={} KiB, t={}, p={}",
        settings.password_hashing.memory_cost,
        settings.password_hashing.time_cost,
        settings.password_hashing.parallelism
    );
}
