//! Money request lifecycle.
//!
//! ```text
//! PENDING ──move to processing──▶ PROCESSING ──approve──▶ COMPLETED
//!                                      │
//!                                      └──────reject─────▶ REJECTED
//! ```
//!
//! Every status change goes through [`step`], keyed by the request kind and
//! the transition. It is the only place that decides whether a transition is
//! allowed and which balance effect it carries, so the ledger rule ("only an
//! approval moves money") lives here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Message used when a request is moved to processing without a reference.
pub const TRANSACTION_ID_REQUIRED: &str = "Transaction ID is Required";
/// Message used when a rejection carries no reason.
pub const REJECTION_REASON_REQUIRED: &str = "rejection reason is required";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Deposit into the wallet.
    Fund,
    /// Withdrawal from the wallet to a bank account.
    Transfer,
}

impl RequestKind {
    pub const ALL: [RequestKind; 2] = [Self::Fund, Self::Transfer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fund => "fund",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for RequestKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "fund" => Ok(Self::Fund),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::Corrupted(format!(
                "invalid request kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    /// `APPROVED` is a legacy spelling of `COMPLETED`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" | "APPROVED" => Ok(Self::Completed),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(EngineError::Corrupted(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

/// Admin commands that move a request forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    MoveToProcessing,
    Approve,
    Reject,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MoveToProcessing => "move_to_processing",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// What a transition does to the owner's wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceEffect {
    None,
    Credit(MoneyCents),
    Debit(MoneyCents),
}

impl BalanceEffect {
    /// Returns the balance after the effect.
    ///
    /// Fails with `InsufficientFunds` when a debit would make the balance
    /// negative.
    pub fn apply(self, balance: MoneyCents) -> ResultEngine<MoneyCents> {
        let overflow = || EngineError::InvalidAmount("balance overflow".to_string());
        match self {
            Self::None => Ok(balance),
            Self::Credit(amount) => balance.checked_add(amount).ok_or_else(overflow),
            Self::Debit(amount) => {
                let after = balance.checked_sub(amount).ok_or_else(overflow)?;
                if after.is_negative() {
                    return Err(EngineError::InsufficientFunds(format!(
                        "balance {balance} does not cover {amount}"
                    )));
                }
                Ok(after)
            }
        }
    }

    pub fn moves_money(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// An allowed status change together with its balance effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub effect: BalanceEffect,
}

/// Amount a settled request moves: the credit for a deposit, the debit
/// (`amount + fee`) for a transfer. A missing fee counts as zero.
pub fn settlement_effect(
    kind: RequestKind,
    amount: MoneyCents,
    fee: Option<MoneyCents>,
) -> ResultEngine<BalanceEffect> {
    match kind {
        RequestKind::Fund => Ok(BalanceEffect::Credit(amount)),
        RequestKind::Transfer => {
            let total = amount
                .checked_add(fee.unwrap_or(MoneyCents::ZERO))
                .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
            Ok(BalanceEffect::Debit(total))
        }
    }
}

/// Decides a transition.
pub fn step(
    kind: RequestKind,
    current: RequestStatus,
    transition: Transition,
    amount: MoneyCents,
    fee: Option<MoneyCents>,
) -> ResultEngine<Step> {
    use RequestStatus::*;

    let (to, effect) = match (current, transition) {
        (Pending, Transition::MoveToProcessing) => (Processing, BalanceEffect::None),
        (Processing, Transition::Approve) => (Completed, settlement_effect(kind, amount, fee)?),
        (Processing, Transition::Reject) => (Rejected, BalanceEffect::None),
        (from, transition) => {
            return Err(EngineError::InvalidTransition(format!(
                "cannot {} a {} request in status {}",
                transition.as_str(),
                kind.as_str(),
                from.as_str()
            )));
        }
    };

    Ok(Step {
        from: current,
        to,
        effect,
    })
}

/// Trims an external transaction reference; blank is rejected.
pub fn normalize_transaction_id(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(TRANSACTION_ID_REQUIRED.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trims a rejection reason; blank is rejected.
pub fn normalize_rejection_reason(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            REJECTION_REASON_REQUIRED.to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
