use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Role, User, Wallet, users, util::normalize_required, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a user together with their (empty, active) wallet.
    pub async fn new_user(&self, username: &str, password: &str, role: Role) -> ResultEngine<User> {
        let username = normalize_required(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;

            let wallet = Wallet::new(username.clone(), self.currency);
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            Ok(User { username, role })
        })
    }

    /// Checks Basic credentials. `None` means unknown user or wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let Some(model) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if model.password != password {
            return Ok(None);
        }
        User::try_from(model).map(Some)
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {username}")))?;
        User::try_from(model)
    }
}
