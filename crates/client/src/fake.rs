//! In-process backend for tests: keeps requests and one wallet in memory
//! and counts calls per endpoint.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use api_types::{
    Currency,
    bank_account::{BankAccountNew, BankAccountView},
    request::{
        FundRequestNew, MoneyRequestView, PageQuery, RequestDetails, RequestKind, RequestPage,
        RequestStatus, RequestSummary, StatusCount, TransferRequestNew,
    },
    transition::{MoveToProcessing, RejectRequest, TransitionOutcome},
    wallet::{BalanceView, WalletStatus, WalletView},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{Backend, ClientError};

#[derive(Default)]
struct FakeState {
    balance_minor: i64,
    requests: Vec<MoneyRequestView>,
    calls: HashMap<&'static str, usize>,
    fail_next: bool,
    fail_endpoint: Option<&'static str>,
    replay_approvals: bool,
    leak_all_statuses: bool,
}

pub struct FakeBackend {
    state: Mutex<FakeState>,
}

fn transport_error() -> ClientError {
    match reqwest::Client::new().get("not a url").build() {
        Err(err) => ClientError::Transport(err),
        Ok(_) => ClientError::Server("network down".to_string()),
    }
}

fn view(amount_minor: i64, fee_minor: Option<i64>, details: RequestDetails) -> MoneyRequestView {
    MoneyRequestView {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        amount_minor,
        fee_minor,
        description: String::new(),
        status: RequestStatus::Pending,
        transaction_id: None,
        rejection_reason: None,
        reviewed_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        details,
    }
}

fn transfer_details(account_id: Uuid) -> RequestDetails {
    RequestDetails::Transfer {
        account_id,
        account_holder_name: "Alice Rao".to_string(),
        account_number: "123456789012".to_string(),
        ifsc_code: "HDFC0001234".to_string(),
    }
}

impl FakeBackend {
    pub fn new(balance_minor: i64) -> Self {
        Self {
            state: Mutex::new(FakeState {
                balance_minor,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn seed_fund(&self, amount_minor: i64, status: RequestStatus) -> Uuid {
        let mut request = view(
            amount_minor,
            None,
            RequestDetails::Fund {
                location: "Pune".to_string(),
            },
        );
        request.status = status;
        let id = request.id;
        self.lock().requests.push(request);
        id
    }

    pub fn seed_transfer(&self, amount_minor: i64, fee_minor: i64, status: RequestStatus) -> Uuid {
        let mut request = view(amount_minor, Some(fee_minor), transfer_details(Uuid::new_v4()));
        request.status = status;
        let id = request.id;
        self.lock().requests.push(request);
        id
    }

    /// The next call fails as if the network was down.
    pub fn fail_next(&self) {
        self.lock().fail_next = true;
    }

    /// The next call to `endpoint` fails as if the network was down.
    pub fn fail_next_on(&self, endpoint: &'static str) {
        self.lock().fail_endpoint = Some(endpoint);
    }

    /// Approving an already completed request answers with the same success
    /// again instead of a conflict.
    pub fn replay_approvals(&self) {
        self.lock().replay_approvals = true;
    }

    /// Listing ignores the status filter.
    pub fn leak_all_statuses(&self) {
        self.lock().leak_all_statuses = true;
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.lock().calls.get(endpoint).copied().unwrap_or(0)
    }

    pub fn balance_minor(&self) -> i64 {
        self.lock().balance_minor
    }

    /// Marks a stored request completed without touching the balance, as if
    /// an admin elsewhere had settled it.
    pub fn complete(&self, id: Uuid, balance_minor: i64) {
        let mut state = self.lock();
        state.balance_minor = balance_minor;
        if let Some(request) = state.requests.iter_mut().find(|r| r.id == id) {
            request.status = RequestStatus::Completed;
        }
    }

    fn enter(&self, endpoint: &'static str) -> Result<MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.lock();
        *state.calls.entry(endpoint).or_default() += 1;
        let targeted = state.fail_endpoint == Some(endpoint);
        if targeted {
            state.fail_endpoint = None;
        }
        if std::mem::take(&mut state.fail_next) || targeted {
            return Err(transport_error());
        }
        Ok(state)
    }

    fn transition(
        &self,
        endpoint: &'static str,
        id: Uuid,
        apply: impl FnOnce(&mut MoneyRequestView, &mut i64, bool) -> Result<bool, ClientError>,
    ) -> Result<TransitionOutcome, ClientError> {
        let mut guard = self.enter(endpoint)?;
        let state = &mut *guard;
        let replay = state.replay_approvals;
        let request = state
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("\"request {id}\" key not found!")))?;
        let moved = apply(request, &mut state.balance_minor, replay)?;
        request.updated_at = Utc::now();
        Ok(TransitionOutcome {
            request: request.clone(),
            balance_after_minor: moved.then_some(state.balance_minor),
        })
    }
}

fn conflict(request: &MoneyRequestView) -> ClientError {
    ClientError::Conflict(format!(
        "Invalid transition: request is {}",
        request.status.as_str()
    ))
}

impl Backend for FakeBackend {
    async fn wallet(&self) -> Result<WalletView, ClientError> {
        let state = self.enter("wallet")?;
        Ok(WalletView {
            id: Uuid::nil(),
            user_id: "alice".to_string(),
            balance_minor: state.balance_minor,
            currency: Currency::Inr,
            status: WalletStatus::Active,
            updated_at: Utc::now(),
        })
    }

    async fn balance(&self) -> Result<BalanceView, ClientError> {
        let state = self.enter("balance")?;
        Ok(BalanceView {
            balance_minor: state.balance_minor,
            currency: Currency::Inr,
        })
    }

    async fn bank_accounts(&self) -> Result<Vec<BankAccountView>, ClientError> {
        self.enter("bank_accounts")?;
        Ok(Vec::new())
    }

    async fn add_bank_account(
        &self,
        payload: &BankAccountNew,
    ) -> Result<BankAccountView, ClientError> {
        self.enter("add_bank_account")?;
        Ok(BankAccountView {
            id: Uuid::new_v4(),
            account_holder_name: payload.account_holder_name.clone(),
            account_number: payload.account_number.clone(),
            ifsc_code: payload.ifsc_code.clone(),
            bank_name: payload.bank_name.clone(),
            created_at: Utc::now(),
        })
    }

    async fn create_fund_request(
        &self,
        payload: &FundRequestNew,
    ) -> Result<MoneyRequestView, ClientError> {
        let mut state = self.enter("create_fund_request")?;
        let mut request = view(
            payload.amount_minor,
            None,
            RequestDetails::Fund {
                location: payload.location.clone(),
            },
        );
        request.description = payload.description.clone();
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn create_transfer_request(
        &self,
        payload: &TransferRequestNew,
    ) -> Result<MoneyRequestView, ClientError> {
        let mut state = self.enter("create_transfer_request")?;
        let mut request = view(payload.amount_minor, None, transfer_details(payload.account_id));
        request.description = payload.description.clone();
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn my_requests(&self) -> Result<Vec<MoneyRequestView>, ClientError> {
        let state = self.enter("my_requests")?;
        Ok(state.requests.iter().rev().cloned().collect())
    }

    async fn requests_page(
        &self,
        kind: RequestKind,
        query: &PageQuery,
    ) -> Result<RequestPage, ClientError> {
        let state = self.enter("requests_page")?;
        let items: Vec<_> = state
            .requests
            .iter()
            .filter(|r| r.kind() == kind)
            .filter(|r| state.leak_all_statuses || r.status == query.status)
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok(RequestPage {
            items,
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(10),
            total,
            total_pages: total.div_ceil(10),
        })
    }

    async fn request_summary(&self, kind: RequestKind) -> Result<RequestSummary, ClientError> {
        let state = self.enter("request_summary")?;
        let counts = RequestStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: state
                    .requests
                    .iter()
                    .filter(|r| r.kind() == kind && r.status == status)
                    .count() as u64,
            })
            .collect();
        Ok(RequestSummary { kind, counts })
    }

    async fn move_to_processing(
        &self,
        _kind: RequestKind,
        id: Uuid,
        payload: &MoveToProcessing,
    ) -> Result<TransitionOutcome, ClientError> {
        self.transition("move_to_processing", id, |request, _, _| {
            if request.status != RequestStatus::Pending {
                return Err(conflict(request));
            }
            request.status = RequestStatus::Processing;
            request.transaction_id = Some(payload.transaction_id.clone());
            Ok(false)
        })
    }

    async fn approve(&self, _kind: RequestKind, id: Uuid) -> Result<TransitionOutcome, ClientError> {
        self.transition("approve", id, |request, balance, replay| {
            match request.status {
                RequestStatus::Processing => {}
                RequestStatus::Completed if replay => return Ok(true),
                _ => return Err(conflict(request)),
            }
            let delta = match request.kind() {
                RequestKind::Fund => request.amount_minor,
                RequestKind::Transfer => -(request.amount_minor + request.fee_minor.unwrap_or(0)),
            };
            if *balance + delta < 0 {
                return Err(ClientError::Validation(
                    "Insufficient funds: balance does not cover transfer".to_string(),
                ));
            }
            *balance += delta;
            request.status = RequestStatus::Completed;
            Ok(true)
        })
    }

    async fn reject(
        &self,
        _kind: RequestKind,
        id: Uuid,
        payload: &RejectRequest,
    ) -> Result<TransitionOutcome, ClientError> {
        self.transition("reject", id, |request, _, _| {
            if request.status != RequestStatus::Processing {
                return Err(conflict(request));
            }
            request.status = RequestStatus::Rejected;
            request.rejection_reason = Some(payload.reason.clone());
            Ok(false)
        })
    }
}
