use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Currency, Engine, EngineError, Role, Wallet, WalletStatus};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "paydesk_admin")]
#[command(about = "Admin utilities for Paydesk (bootstrap users, freeze wallets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./paydesk.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Wallet(WalletArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user and their wallet. The password is read from the terminal.
    Create(UserCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_enum, default_value = "user")]
    role: RoleArg,
    /// Currency of the new wallet.
    #[arg(long, default_value = "INR")]
    currency: String,
}

#[derive(Args, Debug)]
struct WalletArgs {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    Show(WalletTarget),
    /// Refuse new requests against the wallet.
    Freeze(WalletTarget),
    Unfreeze(WalletTarget),
}

#[derive(Args, Debug)]
struct WalletTarget {
    #[arg(long)]
    username: String,
}

fn print_wallet(wallet: &Wallet) {
    println!(
        "{}: {} ({})",
        wallet.user_id,
        wallet.balance.display_in(wallet.currency),
        wallet.status.as_str()
    );
}

/// Raw mode for the lifetime of a password prompt.
struct RawMode;

impl RawMode {
    fn on() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn say(out: &mut impl Write, line: &str) -> std::io::Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(line)
    )?;
    out.flush()
}

/// Reads one line without echoing it. `None` when the user pressed Ctrl-C.
fn read_secret(label: &str) -> std::io::Result<Option<String>> {
    let _raw = RawMode::on()?;
    let mut out = std::io::stderr();
    say(&mut out, label)?;

    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if ctrl => {
                say(&mut out, "\r\n")?;
                return Ok(None);
            }
            KeyCode::Backspace if secret.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !ctrl => {
                secret.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }
    execute!(out, Print("\r\n"))?;
    Ok(Some(secret))
}

/// Asks for a new password and its confirmation, three attempts at most.
fn new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let Some(first) = read_secret("Password: ")? else {
            return Err("interrupted".into());
        };
        if first.is_empty() {
            say(&mut out, "Password must not be empty.\r\n")?;
            continue;
        }
        let Some(second) = read_secret("Confirm password: ")? else {
            return Err("interrupted".into());
        };
        if first == second {
            return Ok(first);
        }
        say(&mut out, "Passwords do not match. Try again.\r\n")?;
    }
    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let currency: Currency = match args.currency.parse() {
                Ok(currency) => currency,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let engine = Engine::builder()
                .database(db)
                .currency(currency)
                .build()
                .await?;

            let password = new_password()?;
            match engine
                .new_user(&args.username, &password, args.role.into())
                .await
            {
                Ok(user) => println!("created {} {}", user.role.as_str(), user.username),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Wallet(WalletArgs { command }) => {
            let engine = Engine::builder().database(db).build().await?;
            let (target, status) = match command {
                WalletCommand::Show(target) => (target, None),
                WalletCommand::Freeze(target) => (target, Some(WalletStatus::Frozen)),
                WalletCommand::Unfreeze(target) => (target, Some(WalletStatus::Active)),
            };

            let result = match status {
                Some(status) => engine.set_wallet_status(&target.username, status).await,
                None => engine.wallet(&target.username).await,
            };
            match result {
                Ok(wallet) => print_wallet(&wallet),
                Err(EngineError::KeyNotFound(_)) => {
                    eprintln!("user not found: {}", target.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}
