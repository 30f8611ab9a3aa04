//! A wallet owner's view: balance, own requests, deposits and transfers.

use std::collections::HashSet;

use api_types::{
    bank_account::{BankAccountNew, BankAccountView},
    request::{FundRequestNew, MoneyRequestView, TransferRequestNew},
    wallet::{BalanceView, WalletView},
};
use uuid::Uuid;

use crate::{Backend, DeskError};

pub struct WalletSession<B> {
    backend: B,
    wallet: Option<WalletView>,
    balance: Option<BalanceView>,
    requests: Vec<MoneyRequestView>,
    /// Completed requests whose balance change has been picked up.
    settled: HashSet<Uuid>,
}

fn ensure_positive(amount_minor: i64) -> Result<(), DeskError> {
    if amount_minor <= 0 {
        return Err(DeskError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

impl<B: Backend> WalletSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            wallet: None,
            balance: None,
            requests: Vec::new(),
            settled: HashSet::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn wallet(&self) -> Option<&WalletView> {
        self.wallet.as_ref()
    }

    /// Balance as last returned by the server.
    pub fn balance(&self) -> Option<&BalanceView> {
        self.balance.as_ref()
    }

    pub fn requests(&self) -> &[MoneyRequestView] {
        &self.requests
    }

    pub async fn refresh_wallet(&mut self) -> Result<&WalletView, DeskError> {
        let wallet = self.backend.wallet().await?;
        self.balance = Some(BalanceView {
            balance_minor: wallet.balance_minor,
            currency: wallet.currency,
        });
        Ok(self.wallet.insert(wallet))
    }

    pub async fn refresh_balance(&mut self) -> Result<&BalanceView, DeskError> {
        let balance = self.backend.balance().await?;
        if let Some(wallet) = self.wallet.as_mut() {
            wallet.balance_minor = balance.balance_minor;
        }
        Ok(self.balance.insert(balance))
    }

    pub async fn bank_accounts(&self) -> Result<Vec<BankAccountView>, DeskError> {
        Ok(self.backend.bank_accounts().await?)
    }

    pub async fn add_bank_account(
        &self,
        payload: &BankAccountNew,
    ) -> Result<BankAccountView, DeskError> {
        if payload.account_holder_name.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "Account holder name is required".to_string(),
            ));
        }
        Ok(self.backend.add_bank_account(payload).await?)
    }

    /// Asks for money to be added. The request starts `PENDING` and the
    /// local balance is left alone until an admin approves it.
    pub async fn deposit(
        &mut self,
        amount_minor: i64,
        location: &str,
        description: &str,
    ) -> Result<MoneyRequestView, DeskError> {
        ensure_positive(amount_minor)?;
        let location = location.trim();
        if location.is_empty() {
            return Err(DeskError::InvalidInput("Location is required".to_string()));
        }

        let request = self
            .backend
            .create_fund_request(&FundRequestNew {
                amount_minor,
                location: location.to_string(),
                description: description.trim().to_string(),
            })
            .await?;
        self.requests.insert(0, request.clone());
        Ok(request)
    }

    /// Asks for money to be sent to a bank account.
    ///
    /// Amounts above the last known balance are refused without contacting
    /// the server; the server still checks the balance including fees.
    pub async fn send(
        &mut self,
        amount_minor: i64,
        account_id: Uuid,
        description: &str,
    ) -> Result<MoneyRequestView, DeskError> {
        ensure_positive(amount_minor)?;
        let available = self
            .balance
            .as_ref()
            .map(|b| b.balance_minor)
            .ok_or(DeskError::BalanceUnknown)?;
        if amount_minor > available {
            return Err(DeskError::InsufficientBalance {
                requested: amount_minor,
                available,
            });
        }

        let request = self
            .backend
            .create_transfer_request(&TransferRequestNew {
                amount_minor,
                account_id,
                description: description.trim().to_string(),
            })
            .await?;
        self.requests.insert(0, request.clone());
        Ok(request)
    }

    /// Reloads own requests. The balance is fetched again once when a
    /// request is seen completed for the first time; seeing it again does
    /// nothing.
    ///
    /// Nothing is kept when the balance cannot be fetched, so the next
    /// refresh tries again.
    pub async fn refresh_requests(&mut self) -> Result<&[MoneyRequestView], DeskError> {
        let requests = self.backend.my_requests().await?;
        let newly_settled: Vec<Uuid> = requests
            .iter()
            .filter(|r| r.status.is_success() && !self.settled.contains(&r.id))
            .map(|r| r.id)
            .collect();
        if !newly_settled.is_empty() {
            self.refresh_balance().await?;
            self.settled.extend(newly_settled);
        }
        self.requests = requests;
        Ok(&self.requests)
    }
}
