use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{BankAccount, BankAccountCmd, EngineError, ResultEngine, bank_accounts};

use super::Engine;

impl Engine {
    /// Register a bank account for the caller.
    pub async fn add_bank_account(&self, cmd: BankAccountCmd) -> ResultEngine<BankAccount> {
        let account = BankAccount::new(
            cmd.user_id,
            &cmd.account_holder_name,
            &cmd.account_number,
            &cmd.ifsc_code,
            cmd.bank_name.as_deref(),
        )?;

        let duplicate = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(account.user_id.clone()))
            .filter(bank_accounts::Column::AccountNumber.eq(account.account_number.clone()))
            .filter(bank_accounts::Column::IfscCode.eq(account.ifsc_code.clone()))
            .one(&self.database)
            .await?
            .is_some();
        if duplicate {
            return Err(EngineError::ExistingKey(format!(
                "bank account {}",
                account.account_number
            )));
        }

        bank_accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account)
    }

    /// Bank accounts of `user_id`, oldest first.
    pub async fn bank_accounts(&self, user_id: &str) -> ResultEngine<Vec<BankAccount>> {
        bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(bank_accounts::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BankAccount::try_from)
            .collect()
    }

    /// Accounts of other users are reported as missing.
    pub(super) async fn require_bank_account<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultEngine<BankAccount> {
        let model = bank_accounts::Entity::find_by_id(account_id.to_string())
            .filter(bank_accounts::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("bank account {account_id}")))?;
        BankAccount::try_from(model)
    }
}
