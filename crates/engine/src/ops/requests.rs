use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    BalanceEffect, BankSnapshot, EngineError, FundRequestCmd, MAX_PAGE_LIMIT, MoneyRequest,
    PageCmd, RequestKind, RequestStatus, ResultEngine, TransferRequestCmd, Wallet, requests,
    util::normalize_description, workflow::settlement_effect,
};

use super::{Engine, with_tx};

/// One page of a listing.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusCount {
    pub status: RequestStatus,
    pub count: u64,
}

/// Stored spellings of a status. Completed rows written before the rename
/// still say `APPROVED`.
fn stored_statuses(status: RequestStatus) -> Vec<&'static str> {
    match status {
        RequestStatus::Completed => vec![RequestStatus::Completed.as_str(), "APPROVED"],
        other => vec![other.as_str()],
    }
}

impl Engine {
    /// Ask for money to be added to the caller's wallet.
    pub async fn create_fund_request(&self, cmd: FundRequestCmd) -> ResultEngine<MoneyRequest> {
        let description = normalize_description(&cmd.description)?;
        let request = MoneyRequest::fund(cmd.user_id, cmd.amount, &cmd.location, description)?;

        with_tx!(self, |db_tx| {
            self.require_active_wallet(&db_tx, &request.user_id).await?;
            requests::ActiveModel::from(&request).insert(&db_tx).await?;
            tracing::info!(
                request_id = %request.id,
                user = %request.user_id,
                amount = request.amount.cents(),
                "fund request created"
            );
            Ok(request)
        })
    }

    /// Ask for money to be sent from the caller's wallet to one of their
    /// bank accounts.
    ///
    /// The wallet must cover `amount + fee` when the request is created. The
    /// balance is checked again at approval, since other requests may settle
    /// in between.
    pub async fn create_transfer_request(
        &self,
        cmd: TransferRequestCmd,
    ) -> ResultEngine<MoneyRequest> {
        let description = normalize_description(&cmd.description)?;

        with_tx!(self, |db_tx| {
            let wallet = self.require_active_wallet(&db_tx, &cmd.user_id).await?;
            let account = self
                .require_bank_account(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;

            let request = MoneyRequest::transfer(
                cmd.user_id.clone(),
                cmd.amount,
                self.transfer_fee,
                BankSnapshot::from(&account),
                description,
            )?;
            if let BalanceEffect::Debit(total) =
                settlement_effect(request.kind(), request.amount, request.fee)?
            {
                wallet.ensure_covers(total)?;
            }

            requests::ActiveModel::from(&request).insert(&db_tx).await?;
            tracing::info!(
                request_id = %request.id,
                user = %request.user_id,
                amount = request.amount.cents(),
                fee = request.fee.map_or(0, |fee| fee.cents()),
                "transfer request created"
            );
            Ok(request)
        })
    }

    /// Every request of `user_id`, newest first.
    pub async fn user_requests(&self, user_id: &str) -> ResultEngine<Vec<MoneyRequest>> {
        requests::Entity::find()
            .filter(requests::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(requests::Column::CreatedAt)
            .order_by_desc(requests::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(MoneyRequest::try_from)
            .collect()
    }

    pub async fn request(&self, kind: RequestKind, id: Uuid) -> ResultEngine<MoneyRequest> {
        self.require_request(&self.database, kind, id).await
    }

    /// Requests of one kind in exactly one status, newest first.
    ///
    /// A page past the end is empty rather than an error. `page` and `limit`
    /// are clamped again since the command fields are public.
    pub async fn requests_page(&self, cmd: PageCmd) -> ResultEngine<Page<MoneyRequest>> {
        let page = cmd.page.max(1);
        let limit = cmd.limit.clamp(1, MAX_PAGE_LIMIT);
        let paginator = requests::Entity::find()
            .filter(requests::Column::Kind.eq(cmd.kind.as_str()))
            .filter(requests::Column::Status.is_in(stored_statuses(cmd.status)))
            .order_by_desc(requests::Column::CreatedAt)
            .order_by_desc(requests::Column::Id)
            .paginate(&self.database, limit);

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(MoneyRequest::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Page {
            items,
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        })
    }

    /// Number of requests of `kind` in each status.
    pub async fn request_summary(&self, kind: RequestKind) -> ResultEngine<Vec<StatusCount>> {
        let mut counts = Vec::with_capacity(RequestStatus::ALL.len());
        for status in RequestStatus::ALL {
            let count = requests::Entity::find()
                .filter(requests::Column::Kind.eq(kind.as_str()))
                .filter(requests::Column::Status.is_in(stored_statuses(status)))
                .count(&self.database)
                .await?;
            counts.push(StatusCount { status, count });
        }
        Ok(counts)
    }

    pub(super) async fn require_request<C: ConnectionTrait>(
        &self,
        db: &C,
        kind: RequestKind,
        id: Uuid,
    ) -> ResultEngine<MoneyRequest> {
        let model = requests::Entity::find_by_id(id.to_string())
            .filter(requests::Column::Kind.eq(kind.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{} request {id}", kind.as_str())))?;
        MoneyRequest::try_from(model)
    }

    async fn require_active_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
    ) -> ResultEngine<Wallet> {
        let wallet = self.require_wallet(db, user_id).await?;
        if !wallet.is_active() {
            return Err(EngineError::Forbidden(format!(
                "wallet of {user_id} is frozen"
            )));
        }
        Ok(wallet)
    }
}
