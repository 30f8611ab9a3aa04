use api_types::{
    bank_account::{BankAccountNew, BankAccountView},
    error::ErrorResponse,
    request::{
        FundRequestNew, MoneyRequestView, PageQuery, RequestKind, RequestPage, RequestSummary,
        TransferRequestNew,
    },
    transition::{MoveToProcessing, RejectRequest, TransitionOutcome},
    wallet::{BalanceView, WalletView},
};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{Backend, ClientError};

/// Basic-auth credentials sent with every request.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    credentials: Credentials,
}

impl Client {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            credentials,
        })
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let res = request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res.json::<T>().await.map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized(body),
            403 => ClientError::Forbidden(body),
            404 => ClientError::NotFound(body),
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        tracing::debug!(%status, "request failed: {err}");
        Err(err)
    }

    fn admin_path(kind: RequestKind, id: Uuid, action: &str) -> String {
        format!("admin/{}/{id}/{action}", kind.path_segment())
    }
}

impl Backend for Client {
    async fn wallet(&self) -> Result<WalletView, ClientError> {
        self.send(self.http.get(self.endpoint("wallet")?)).await
    }

    async fn balance(&self) -> Result<BalanceView, ClientError> {
        self.send(self.http.get(self.endpoint("wallet/balance")?))
            .await
    }

    async fn bank_accounts(&self) -> Result<Vec<BankAccountView>, ClientError> {
        self.send(self.http.get(self.endpoint("bank-accounts")?))
            .await
    }

    async fn add_bank_account(
        &self,
        payload: &BankAccountNew,
    ) -> Result<BankAccountView, ClientError> {
        self.send(self.http.post(self.endpoint("bank-accounts")?).json(payload))
            .await
    }

    async fn create_fund_request(
        &self,
        payload: &FundRequestNew,
    ) -> Result<MoneyRequestView, ClientError> {
        self.send(
            self.http
                .post(self.endpoint("add-money/create")?)
                .json(payload),
        )
        .await
    }

    async fn create_transfer_request(
        &self,
        payload: &TransferRequestNew,
    ) -> Result<MoneyRequestView, ClientError> {
        self.send(
            self.http
                .post(self.endpoint("transfer-money/create")?)
                .json(payload),
        )
        .await
    }

    async fn my_requests(&self) -> Result<Vec<MoneyRequestView>, ClientError> {
        self.send(
            self.http
                .get(self.endpoint("transactions/my-transactions")?),
        )
        .await
    }

    async fn requests_page(
        &self,
        kind: RequestKind,
        query: &PageQuery,
    ) -> Result<RequestPage, ClientError> {
        let path = format!("admin/{}/requests", kind.path_segment());
        self.send(self.http.get(self.endpoint(&path)?).query(query))
            .await
    }

    async fn request_summary(&self, kind: RequestKind) -> Result<RequestSummary, ClientError> {
        let path = format!("admin/{}/summary", kind.path_segment());
        self.send(self.http.get(self.endpoint(&path)?)).await
    }

    async fn move_to_processing(
        &self,
        kind: RequestKind,
        id: Uuid,
        payload: &MoveToProcessing,
    ) -> Result<TransitionOutcome, ClientError> {
        let path = Self::admin_path(kind, id, "update-to-processing");
        self.send(self.http.patch(self.endpoint(&path)?).json(payload))
            .await
    }

    async fn approve(&self, kind: RequestKind, id: Uuid) -> Result<TransitionOutcome, ClientError> {
        let path = Self::admin_path(kind, id, "approve");
        self.send(self.http.patch(self.endpoint(&path)?)).await
    }

    async fn reject(
        &self,
        kind: RequestKind,
        id: Uuid,
        payload: &RejectRequest,
    ) -> Result<TransitionOutcome, ClientError> {
        let path = Self::admin_path(kind, id, "reject");
        self.send(self.http.patch(self.endpoint(&path)?).json(payload))
            .await
    }
}
