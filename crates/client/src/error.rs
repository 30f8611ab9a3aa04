use thiserror::Error;
use uuid::Uuid;

/// Shown when a failure carries no message from the server.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// A failed call to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Text for the user: the server's message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Validation(msg)
            | Self::Server(msg)
                if !msg.trim().is_empty() && msg != "unknown error" =>
            {
                msg.clone()
            }
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Failures of [`WalletSession`](crate::WalletSession) and
/// [`AdminDesk`](crate::AdminDesk) operations.
///
/// Every variant except `Client` is raised before any network call.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("{}", engine::TRANSACTION_ID_REQUIRED)]
    TransactionIdRequired,
    #[error("Please select a rejection reason")]
    ReasonRequired,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Amount exceeds your wallet balance")]
    InsufficientBalance { requested: i64, available: i64 },
    #[error("Wallet balance not loaded yet")]
    BalanceUnknown,
    #[error("request {0} already has an action in progress")]
    Busy(Uuid),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl DeskError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// True when the server was never contacted.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Client(_))
    }
}
