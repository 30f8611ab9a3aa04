use api_types::{
    Currency,
    bank_account::BankAccountNew,
    request::{MoneyRequestView, RequestKind, RequestStatus},
    transition::RejectionReason,
};
use engine::MoneyCents;
use paydesk_client::{
    ActionOutcome, AdminAction, AdminDesk, Client, ClientError, Credentials, DeskError,
    RejectInput, WalletSession,
};
use thiserror::Error;

use crate::config::{AppConfig, Command};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Desk(#[from] DeskError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Input(String),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            Self::Desk(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

fn code(currency: Currency) -> &'static str {
    match currency {
        Currency::Inr => "INR",
        Currency::Eur => "EUR",
        Currency::Usd => "USD",
    }
}

fn parse_amount(raw: &str) -> Result<i64> {
    MoneyCents::parse_positive(raw)
        .map(MoneyCents::cents)
        .map_err(|err| AppError::Input(err.to_string()))
}

fn parse_kind(raw: &str) -> Result<RequestKind> {
    RequestKind::from_path_segment(raw).ok_or_else(|| {
        AppError::Input(format!(
            "unknown request kind {raw}, expected add-money or transfer-money"
        ))
    })
}

fn parse_reason(raw: &str, note: String) -> Result<RejectInput> {
    let reason: RejectionReason = serde_json::from_value(serde_json::Value::String(
        raw.trim().to_ascii_lowercase(),
    ))
    .map_err(|_| AppError::Input(format!("unknown rejection reason: {raw}")))?;
    Ok(RejectInput {
        reason: Some(reason),
        custom: note,
    })
}

fn print_request(request: &MoneyRequestView) {
    let counterpart = request
        .account_holder_name()
        .map(|name| format!(" to {name}"))
        .unwrap_or_default();
    println!(
        "{}  {:<10}  {:>12}{}  {}",
        request.id,
        request.status.as_str(),
        MoneyCents::new(request.amount_minor),
        counterpart,
        request.description
    );
    if let Some(reason) = &request.rejection_reason {
        println!("    rejected: {reason}");
    }
}

fn print_outcome(action: AdminAction, outcome: &ActionOutcome) {
    println!("{action:?}: request is now {}", outcome.request.status.as_str());
    if let Some(balance) = outcome.balance_after_minor {
        println!(
            "owner balance: {}{}",
            MoneyCents::new(balance),
            if outcome.newly_settled {
                ""
            } else {
                " (already settled)"
            }
        );
    }
}

pub struct App {
    client: Client,
}

impl App {
    pub fn new(config: &AppConfig, password: String) -> Result<Self> {
        if config.username.is_empty() {
            return Err(AppError::Input(
                "username is required (--username or PAYDESK_CLIENT_USERNAME)".to_string(),
            ));
        }
        let client = Client::new(
            &config.base_url,
            Credentials {
                username: config.username.clone(),
                password,
            },
        )?;
        Ok(Self { client })
    }

    pub async fn run(self, command: Command) -> Result<()> {
        match command {
            Command::Wallet => {
                let mut session = WalletSession::new(self.client);
                let wallet = session.refresh_wallet().await?;
                println!("{}", serde_json::to_string_pretty(wallet)?);
            }
            Command::Balance => {
                let mut session = WalletSession::new(self.client);
                let balance = session.refresh_balance().await?;
                println!(
                    "{} {}",
                    MoneyCents::new(balance.balance_minor),
                    code(balance.currency)
                );
            }
            Command::Deposit {
                amount,
                location,
                description,
            } => {
                let mut session = WalletSession::new(self.client);
                let request = session
                    .deposit(parse_amount(&amount)?, &location, &description)
                    .await?;
                println!("deposit request {} is awaiting approval", request.id);
            }
            Command::Send {
                amount,
                account,
                description,
            } => {
                let mut session = WalletSession::new(self.client);
                session.refresh_balance().await?;
                let request = session
                    .send(parse_amount(&amount)?, account, &description)
                    .await?;
                let fee = request.fee_minor.unwrap_or(0);
                println!(
                    "transfer request {} is awaiting approval (fee {})",
                    request.id,
                    MoneyCents::new(fee)
                );
            }
            Command::History => {
                let mut session = WalletSession::new(self.client);
                for request in session.refresh_requests().await? {
                    print_request(request);
                }
            }
            Command::Accounts => {
                let session = WalletSession::new(self.client);
                for account in session.bank_accounts().await? {
                    println!(
                        "{}  {}  {}  {}",
                        account.id,
                        account.account_holder_name,
                        account.account_number,
                        account.ifsc_code
                    );
                }
            }
            Command::AddAccount {
                holder,
                number,
                ifsc,
                bank,
            } => {
                let session = WalletSession::new(self.client);
                let account = session
                    .add_bank_account(&BankAccountNew {
                        account_holder_name: holder,
                        account_number: number,
                        ifsc_code: ifsc,
                        bank_name: bank,
                    })
                    .await?;
                println!("added bank account {}", account.id);
            }
            Command::List {
                kind,
                status,
                page,
                search,
            } => {
                let kind = parse_kind(&kind)?;
                let status: RequestStatus = status.parse().map_err(AppError::Input)?;
                let desk = AdminDesk::new(self.client);
                desk.load_tab(kind, status, page).await?;
                let items = match search.as_deref() {
                    Some(query) => desk.search(kind, status, query),
                    None => desk.tab(kind, status),
                };
                for request in &items {
                    print_request(request);
                }
                if let Some((page, total, total_pages)) = desk.tab_position(kind, status) {
                    println!("page {page}/{total_pages}, {total} {} in total", status.as_str());
                }
            }
            Command::Process {
                kind,
                id,
                transaction_id,
            } => {
                let desk = AdminDesk::new(self.client);
                let outcome = desk
                    .move_to_processing(parse_kind(&kind)?, id, &transaction_id)
                    .await?;
                print_outcome(AdminAction::MoveToProcessing, &outcome);
            }
            Command::Approve { kind, id } => {
                let desk = AdminDesk::new(self.client);
                let outcome = desk.approve(parse_kind(&kind)?, id).await?;
                print_outcome(AdminAction::Approve, &outcome);
            }
            Command::Reject {
                kind,
                id,
                reason,
                note,
            } => {
                let input = parse_reason(&reason, note)?;
                let desk = AdminDesk::new(self.client);
                let outcome = desk.reject(parse_kind(&kind)?, id, &input).await?;
                print_outcome(AdminAction::Reject, &outcome);
            }
        }
        Ok(())
    }
}
