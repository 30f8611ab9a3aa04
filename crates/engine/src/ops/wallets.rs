use chrono::Utc;
use sea_orm::{
    ConnectionTrait, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, MoneyCents, ResultEngine, Wallet, WalletStatus, wallets};

use super::{Engine, with_tx};

impl Engine {
    /// Return the wallet owned by `user_id`.
    pub async fn wallet(&self, user_id: &str) -> ResultEngine<Wallet> {
        self.require_wallet(&self.database, user_id).await
    }

    /// Freezes or reactivates a wallet. Frozen wallets accept no new requests;
    /// requests already in flight can still be settled.
    pub async fn set_wallet_status(
        &self,
        user_id: &str,
        status: WalletStatus,
    ) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let mut wallet = self.require_wallet(&db_tx, user_id).await?;
            wallet.status = status;
            wallet.updated_at = Utc::now();
            wallets::Entity::update_many()
                .col_expr(wallets::Column::Status, Expr::value(status.as_str()))
                .col_expr(wallets::Column::UpdatedAt, Expr::value(wallet.updated_at))
                .filter(wallets::Column::Id.eq(wallet.id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(wallet)
        })
    }

    pub(super) async fn require_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
    ) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("wallet of {user_id}")))?;
        Wallet::try_from(model)
    }

    /// Writes `balance` only if the stored balance is still `expected`.
    pub(super) async fn swap_balance<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet: &Wallet,
        expected: MoneyCents,
        balance: MoneyCents,
    ) -> ResultEngine<Wallet> {
        let now = Utc::now();
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::BalanceMinor, Expr::value(balance.cents()))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet.id.to_string()))
            .filter(wallets::Column::BalanceMinor.eq(expected.cents()))
            .exec(db)
            .await?;
        if result.rows_affected != 1 {
            return Err(EngineError::InvalidTransition(format!(
                "wallet of {} changed concurrently",
                wallet.user_id
            )));
        }
        Ok(Wallet {
            balance,
            updated_at: now,
            ..wallet.clone()
        })
    }
}
