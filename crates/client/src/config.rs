use clap::{Parser, Subcommand};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::Result;

const DEFAULT_CONFIG_PATH: &str = "config/client.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "paydesk_client", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username.
    #[arg(long)]
    username: Option<String>,
    /// Password, only read from the environment.
    #[arg(long, env = "PAYDESK_PASSWORD", hide_env_values = true, hide = true)]
    pub password: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the wallet.
    Wallet,
    /// Show the balance.
    Balance,
    /// Ask for money to be added to the wallet.
    Deposit {
        /// Amount, e.g. `150` or `150.50`.
        amount: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Send money to one of your bank accounts.
    Send {
        amount: String,
        #[arg(long)]
        account: Uuid,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List your requests.
    History,
    /// List your bank accounts.
    Accounts,
    AddAccount {
        #[arg(long)]
        holder: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        ifsc: String,
        #[arg(long)]
        bank: Option<String>,
    },
    /// Admin: list requests of a kind in a status.
    List {
        /// `add-money` or `transfer-money`.
        kind: String,
        #[arg(long, default_value = "PENDING")]
        status: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Substring filter over the loaded page.
        #[arg(long)]
        search: Option<String>,
    },
    /// Admin: move a pending request to processing.
    Process {
        kind: String,
        id: Uuid,
        #[arg(long)]
        transaction_id: String,
    },
    /// Admin: approve a processing request.
    Approve { kind: String, id: Uuid },
    /// Admin: reject a processing request.
    Reject {
        kind: String,
        id: Uuid,
        /// One of the listed reasons (`invalid_bank_details`, ...) or `other`.
        #[arg(long)]
        reason: String,
        /// Text used with `--reason other`.
        #[arg(long, default_value = "")]
        note: String,
    },
}

pub fn load() -> Result<(AppConfig, Args)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("PAYDESK_CLIENT"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url.clone() {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username.clone() {
        settings.username = username;
    }

    Ok((settings, args))
}
