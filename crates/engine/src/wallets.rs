//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError, MoneyCents, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletStatus {
    Active,
    /// No new requests may be created against a frozen wallet.
    Frozen,
}

impl WalletStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
        }
    }
}

impl TryFrom<&str> for WalletStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "frozen" => Ok(Self::Frozen),
            other => Err(EngineError::Corrupted(format!(
                "invalid wallet status: {other}"
            ))),
        }
    }
}

/// A user's balance ledger.
///
/// The balance is never negative and only changes when a request owned by
/// the same user is approved.
#[derive(Clone, Debug, PartialEq)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: String,
    pub balance: MoneyCents,
    pub currency: Currency,
    pub status: WalletStatus,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: MoneyCents::ZERO,
            currency,
            status: WalletStatus::Active,
            updated_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == WalletStatus::Active
    }

    /// Rejects a debit the current balance cannot cover.
    pub fn ensure_covers(&self, amount: MoneyCents) -> ResultEngine<()> {
        if amount > self.balance {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {} does not cover {}",
                self.balance.display_in(self.currency),
                amount.display_in(self.currency)
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub balance_minor: i64,
    pub currency: String,
    pub status: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            balance_minor: ActiveValue::Set(value.balance.cents()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.balance_minor < 0 {
            return Err(EngineError::Corrupted(format!(
                "wallet {} has a negative balance",
                model.id
            )));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: model.user_id,
            balance: MoneyCents::new(model.balance_minor),
            currency: model.currency.parse::<Currency>()?,
            status: WalletStatus::try_from(model.status.as_str())?,
            updated_at: model.updated_at,
        })
    }
}
