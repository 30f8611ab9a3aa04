use std::future::Future;

use api_types::{
    bank_account::{BankAccountNew, BankAccountView},
    request::{
        FundRequestNew, MoneyRequestView, PageQuery, RequestKind, RequestPage, RequestSummary,
        TransferRequestNew,
    },
    transition::{MoveToProcessing, RejectRequest, TransitionOutcome},
    wallet::{BalanceView, WalletView},
};
use uuid::Uuid;

use crate::ClientError;

/// One method per server endpoint, authenticated as a fixed user.
///
/// [`Client`](crate::Client) is the HTTP implementation; tests substitute
/// an in-process one.
pub trait Backend: Send + Sync {
    fn wallet(&self) -> impl Future<Output = Result<WalletView, ClientError>> + Send;

    fn balance(&self) -> impl Future<Output = Result<BalanceView, ClientError>> + Send;

    fn bank_accounts(
        &self,
    ) -> impl Future<Output = Result<Vec<BankAccountView>, ClientError>> + Send;

    fn add_bank_account(
        &self,
        payload: &BankAccountNew,
    ) -> impl Future<Output = Result<BankAccountView, ClientError>> + Send;

    fn create_fund_request(
        &self,
        payload: &FundRequestNew,
    ) -> impl Future<Output = Result<MoneyRequestView, ClientError>> + Send;

    fn create_transfer_request(
        &self,
        payload: &TransferRequestNew,
    ) -> impl Future<Output = Result<MoneyRequestView, ClientError>> + Send;

    fn my_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<MoneyRequestView>, ClientError>> + Send;

    fn requests_page(
        &self,
        kind: RequestKind,
        query: &PageQuery,
    ) -> impl Future<Output = Result<RequestPage, ClientError>> + Send;

    fn request_summary(
        &self,
        kind: RequestKind,
    ) -> impl Future<Output = Result<RequestSummary, ClientError>> + Send;

    fn move_to_processing(
        &self,
        kind: RequestKind,
        id: Uuid,
        payload: &MoveToProcessing,
    ) -> impl Future<Output = Result<TransitionOutcome, ClientError>> + Send;

    fn approve(
        &self,
        kind: RequestKind,
        id: Uuid,
    ) -> impl Future<Output = Result<TransitionOutcome, ClientError>> + Send;

    fn reject(
        &self,
        kind: RequestKind,
        id: Uuid,
        payload: &RejectRequest,
    ) -> impl Future<Output = Result<TransitionOutcome, ClientError>> + Send;
}
