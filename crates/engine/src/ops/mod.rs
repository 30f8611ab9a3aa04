use sea_orm::DatabaseConnection;

use crate::{Currency, EngineError, MoneyCents, ResultEngine};

mod bank_accounts;
mod requests;
mod transitions;
mod users;
mod wallets;

pub use requests::{Page, StatusCount};
pub use transitions::Settlement;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Flat fee charged on every transfer request.
    transfer_fee: MoneyCents,
    /// Currency given to newly created wallets.
    currency: Currency,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn transfer_fee(&self) -> MoneyCents {
        self.transfer_fee
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    transfer_fee: MoneyCents,
    currency: Currency,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Fee added to the debit of every transfer. Defaults to zero.
    pub fn transfer_fee(mut self, fee: MoneyCents) -> EngineBuilder {
        self.transfer_fee = fee;
        self
    }

    /// Currency of wallets created from now on. Defaults to INR.
    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.transfer_fee.is_negative() {
            return Err(EngineError::InvalidAmount(
                "transfer fee must be >= 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            transfer_fee: self.transfer_fee,
            currency: self.currency,
        })
    }
}
