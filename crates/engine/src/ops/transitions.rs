use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, MoneyRequest, RequestKind, ResultEngine, Transition, Wallet, requests,
    workflow::{self, normalize_rejection_reason, normalize_transaction_id},
};

use super::{Engine, with_tx};

/// A request after a transition, with the owner's wallet when money moved.
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub request: MoneyRequest,
    pub wallet: Option<Wallet>,
}

/// Column written alongside the status.
enum Annotation {
    TransactionId(String),
    RejectionReason(String),
    Nothing,
}

impl Engine {
    /// `PENDING -> PROCESSING`, recording the external payment reference.
    pub async fn move_to_processing(
        &self,
        kind: RequestKind,
        id: Uuid,
        transaction_id: &str,
        admin: &str,
    ) -> ResultEngine<Settlement> {
        let transaction_id = normalize_transaction_id(transaction_id)?;
        self.apply_transition(
            kind,
            id,
            Transition::MoveToProcessing,
            Annotation::TransactionId(transaction_id),
            admin,
        )
        .await
    }

    /// `PROCESSING -> COMPLETED`: the only transition that changes a balance.
    ///
    /// Deposits credit `amount`; transfers debit `amount + fee` and fail with
    /// `InsufficientFunds` if the wallet can no longer cover it, leaving both
    /// the request and the wallet untouched.
    pub async fn approve(
        &self,
        kind: RequestKind,
        id: Uuid,
        admin: &str,
    ) -> ResultEngine<Settlement> {
        self.apply_transition(kind, id, Transition::Approve, Annotation::Nothing, admin)
            .await
    }

    /// `PROCESSING -> REJECTED` with a reason shown to the user.
    pub async fn reject(
        &self,
        kind: RequestKind,
        id: Uuid,
        reason: &str,
        admin: &str,
    ) -> ResultEngine<Settlement> {
        let reason = normalize_rejection_reason(reason)?;
        self.apply_transition(
            kind,
            id,
            Transition::Reject,
            Annotation::RejectionReason(reason),
            admin,
        )
        .await
    }

    async fn apply_transition(
        &self,
        kind: RequestKind,
        id: Uuid,
        transition: Transition,
        annotation: Annotation,
        admin: &str,
    ) -> ResultEngine<Settlement> {
        with_tx!(self, |db_tx| {
            let mut request = self.require_request(&db_tx, kind, id).await?;
            let step = workflow::step(kind, request.status, transition, request.amount, request.fee)?;
            let now = Utc::now();

            let mut update = requests::Entity::update_many()
                .col_expr(requests::Column::Status, Expr::value(step.to.as_str()))
                .col_expr(requests::Column::ReviewedBy, Expr::value(admin))
                .col_expr(requests::Column::UpdatedAt, Expr::value(now));
            match &annotation {
                Annotation::TransactionId(value) => {
                    update = update.col_expr(
                        requests::Column::TransactionId,
                        Expr::value(value.as_str()),
                    );
                    request.transaction_id = Some(value.clone());
                }
                Annotation::RejectionReason(value) => {
                    update = update.col_expr(
                        requests::Column::RejectionReason,
                        Expr::value(value.as_str()),
                    );
                    request.rejection_reason = Some(value.clone());
                }
                Annotation::Nothing => {}
            }

            // Compare-and-set on the status read above: a concurrent transition
            // of the same request leaves zero rows to update.
            let result = update
                .filter(requests::Column::Id.eq(id.to_string()))
                .filter(requests::Column::Status.eq(step.from.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected != 1 {
                return Err(EngineError::InvalidTransition(format!(
                    "{} request {id} is no longer {}",
                    kind.as_str(),
                    step.from.as_str()
                )));
            }

            let wallet = if step.effect.moves_money() {
                let wallet = self.require_wallet(&db_tx, &request.user_id).await?;
                let balance = step.effect.apply(wallet.balance)?;
                Some(
                    self.swap_balance(&db_tx, &wallet, wallet.balance, balance)
                        .await?,
                )
            } else {
                None
            };

            request.status = step.to;
            request.reviewed_by = Some(admin.to_string());
            request.updated_at = now;

            tracing::info!(
                request_id = %id,
                kind = kind.as_str(),
                from = step.from.as_str(),
                to = step.to.as_str(),
                admin,
                balance_after = wallet.as_ref().map(|w| w.balance.cents()),
                "request transition"
            );
            Ok(Settlement { request, wallet })
        })
    }
}
