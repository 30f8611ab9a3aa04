//! Errors returned by the engine.
//!
//! The ones a caller of the request workflow has to tell apart:
//!
//! - [`Validation`]: a transition is missing its required input (transaction
//!   reference, rejection reason).
//! - [`InvalidTransition`]: the request is not in a status that allows the
//!   transition. A repeated approval lands here.
//! - [`InsufficientFunds`]: a transfer would overdraw the wallet.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    /// A stored row that does not describe a valid domain value.
    #[error("Corrupted record: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string()
    }
}
