//! Wallet engine.
//!
//! Owns the authoritative state of wallets, bank accounts and money requests,
//! and the transition rules that move requests from `PENDING` to a terminal
//! status. Balances change in exactly one place: the approval of a request
//! (see [`workflow`]).

pub use bank_accounts::BankAccount;
pub use commands::{
    BankAccountCmd, DEFAULT_PAGE_LIMIT, FundRequestCmd, MAX_PAGE_LIMIT, PageCmd,
    TransferRequestCmd,
};
pub use currency::Currency;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, Page, Settlement, StatusCount};
pub use requests::{BankSnapshot, MoneyRequest, RequestDetails};
pub use users::{Role, User};
pub use wallets::{Wallet, WalletStatus};
pub use workflow::{
    BalanceEffect, RequestKind, RequestStatus, Step, Transition, REJECTION_REASON_REQUIRED,
    TRANSACTION_ID_REQUIRED,
};

mod bank_accounts;
mod commands;
mod currency;
mod error;
mod money;
mod ops;
mod requests;
mod users;
mod util;
mod wallets;
pub mod workflow;

pub type ResultEngine<T> = Result<T, EngineError>;
