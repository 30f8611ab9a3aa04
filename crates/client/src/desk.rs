//! Admin queue: list requests per tab and move them through their
//! lifecycle.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

use api_types::{
    request::{MoneyRequestView, PageQuery, RequestKind, RequestStatus, RequestSummary},
    transition::{MoveToProcessing, RejectRequest, RejectionReason, TransitionOutcome},
};
use uuid::Uuid;

use crate::{Backend, CachedRequest, ClientError, DeskError, RequestCache, TabKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    MoveToProcessing,
    Approve,
    Reject,
}

/// Whether the confirmation dialog of an action stays on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialog {
    Open,
    Closed,
}

impl AdminAction {
    /// Approve and reject dismiss their dialog whatever the outcome; moving
    /// to processing keeps it open on failure so the reference can be
    /// corrected.
    pub fn dialog_after(self, succeeded: bool) -> Dialog {
        match (self, succeeded) {
            (Self::MoveToProcessing, false) => Dialog::Open,
            _ => Dialog::Closed,
        }
    }
}

/// Reason picked in the reject dialog.
#[derive(Clone, Debug)]
pub struct RejectInput {
    pub reason: Option<RejectionReason>,
    /// Only read when `reason` is `Other`.
    pub custom: String,
}

impl RejectInput {
    pub fn listed(reason: RejectionReason) -> Self {
        Self {
            reason: Some(reason),
            custom: String::new(),
        }
    }

    pub fn other(custom: impl Into<String>) -> Self {
        Self {
            reason: Some(RejectionReason::Other),
            custom: custom.into(),
        }
    }

    fn resolve(&self) -> Result<String, DeskError> {
        match self.reason {
            None => Err(DeskError::ReasonRequired),
            Some(RejectionReason::Other) => {
                let custom = self.custom.trim();
                if custom.is_empty() {
                    return Err(DeskError::ReasonRequired);
                }
                Ok(custom.to_string())
            }
            Some(reason) => Ok(reason.label().to_string()),
        }
    }
}

/// What a successful admin action produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome {
    pub request: MoneyRequestView,
    pub balance_after_minor: Option<i64>,
    /// False when this settlement had already been recorded; the mirrored
    /// balance was left alone.
    pub newly_settled: bool,
}

#[derive(Debug, Default)]
struct DeskState {
    cache: RequestCache,
    in_flight: HashSet<Uuid>,
    settled: HashSet<Uuid>,
    /// Owner balances as last reported by an approval.
    balances: HashMap<String, i64>,
}

/// Releases the in-flight slot of a request when the call ends.
struct InFlight<'a> {
    state: &'a Mutex<DeskState>,
    id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.id);
    }
}

/// Admin view over a [`Backend`].
///
/// Methods take `&self`: actions on different requests may run
/// concurrently, while a second action on a request that is still in
/// flight is refused with [`DeskError::Busy`].
pub struct AdminDesk<B> {
    backend: B,
    state: Mutex<DeskState>,
}

impl<B: Backend> AdminDesk<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(DeskState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches one page of a tab. On failure the tab is flagged stale and
    /// its previous content kept.
    pub async fn load_tab(
        &self,
        kind: RequestKind,
        status: RequestStatus,
        page: u64,
    ) -> Result<Vec<MoneyRequestView>, DeskError> {
        let key = TabKey::new(kind, status);
        let query = PageQuery {
            status,
            page: Some(page.max(1)),
            limit: None,
        };
        match self.backend.requests_page(kind, &query).await {
            Ok(page) => {
                let mut state = self.state();
                state.cache.load_tab(key, page);
                Ok(state.cache.tab(key).into_iter().cloned().collect())
            }
            Err(err) => {
                self.state().cache.mark_tab_stale(key);
                Err(err.into())
            }
        }
    }

    pub fn tab(&self, kind: RequestKind, status: RequestStatus) -> Vec<MoneyRequestView> {
        self.state()
            .cache
            .tab(TabKey::new(kind, status))
            .into_iter()
            .cloned()
            .collect()
    }

    /// `(page, total, total_pages)` of a loaded tab.
    pub fn tab_position(&self, kind: RequestKind, status: RequestStatus) -> Option<(u64, u64, u64)> {
        self.state().cache.tab_position(TabKey::new(kind, status))
    }

    pub fn search(
        &self,
        kind: RequestKind,
        status: RequestStatus,
        query: &str,
    ) -> Vec<MoneyRequestView> {
        self.state()
            .cache
            .search(TabKey::new(kind, status), query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn summary(&self, kind: RequestKind) -> Result<RequestSummary, DeskError> {
        Ok(self.backend.request_summary(kind).await?)
    }

    pub fn cached(&self, id: Uuid) -> Option<CachedRequest> {
        self.state().cache.get(id).cloned()
    }

    pub fn mirrored_balance(&self, user_id: &str) -> Option<i64> {
        self.state().balances.get(user_id).copied()
    }

    pub async fn move_to_processing(
        &self,
        kind: RequestKind,
        id: Uuid,
        transaction_id: &str,
    ) -> Result<ActionOutcome, DeskError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(DeskError::TransactionIdRequired);
        }
        let payload = MoveToProcessing {
            transaction_id: transaction_id.to_string(),
        };
        let _slot = self.claim(id)?;
        let result = self.backend.move_to_processing(kind, id, &payload).await;
        self.record(id, AdminAction::MoveToProcessing, result)
    }

    pub async fn approve(&self, kind: RequestKind, id: Uuid) -> Result<ActionOutcome, DeskError> {
        let _slot = self.claim(id)?;
        let result = self.backend.approve(kind, id).await;
        self.record(id, AdminAction::Approve, result)
    }

    pub async fn reject(
        &self,
        kind: RequestKind,
        id: Uuid,
        input: &RejectInput,
    ) -> Result<ActionOutcome, DeskError> {
        let payload = RejectRequest {
            reason: input.resolve()?,
        };
        let _slot = self.claim(id)?;
        let result = self.backend.reject(kind, id, &payload).await;
        self.record(id, AdminAction::Reject, result)
    }

    fn claim(&self, id: Uuid) -> Result<InFlight<'_>, DeskError> {
        if !self.state().in_flight.insert(id) {
            return Err(DeskError::Busy(id));
        }
        Ok(InFlight {
            state: &self.state,
            id,
        })
    }

    fn record(
        &self,
        id: Uuid,
        action: AdminAction,
        result: Result<TransitionOutcome, ClientError>,
    ) -> Result<ActionOutcome, DeskError> {
        let mut state = self.state();
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(%id, ?action, "admin action failed: {err}");
                state.cache.mark_stale(id);
                return Err(err.into());
            }
        };

        let request = outcome.request;
        let mut newly_settled = false;
        if request.status.is_success()
            && let Some(balance) = outcome.balance_after_minor
            && state.settled.insert(request.id)
        {
            state.balances.insert(request.user_id.clone(), balance);
            newly_settled = true;
        }

        state.cache.replace(request.clone());
        Ok(ActionOutcome {
            request,
            balance_after_minor: outcome.balance_after_minor,
            newly_settled,
        })
    }
}
