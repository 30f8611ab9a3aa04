//! Admin endpoints: listing requests and moving them through their
//! lifecycle. Every route here sits behind the admin check.

use api_types::{
    request::{PageQuery, RequestPage, RequestSummary},
    transition::{MoveToProcessing, RejectRequest, TransitionOutcome},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::{PageCmd, RequestKind, Settlement, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

fn parse_target(kind: &str, id: &str) -> Result<(RequestKind, Uuid), ServerError> {
    let kind = views::kind_from_path(kind)?;
    let id = Uuid::parse_str(id)
        .map_err(|_| ServerError::Generic(format!("invalid request id: {id}")))?;
    Ok((kind, id))
}

fn outcome(settlement: Settlement) -> TransitionOutcome {
    TransitionOutcome {
        balance_after_minor: settlement.wallet.map(|wallet| wallet.balance.cents()),
        request: views::request(settlement.request),
    }
}

pub async fn list(
    Path(kind): Path<String>,
    Query(query): Query<PageQuery>,
    State(state): State<ServerState>,
) -> Result<Json<RequestPage>, ServerError> {
    let kind = views::kind_from_path(&kind)?;
    let cmd = PageCmd::new(kind, views::status(query.status))
        .page(query.page)
        .limit(query.limit);
    let page = state.engine.requests_page(cmd).await?;
    Ok(Json(views::page(page)))
}

pub async fn summary(
    Path(segment): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<RequestSummary>, ServerError> {
    let kind = views::kind_from_path(&segment)?;
    let counts = state.engine.request_summary(kind).await?;
    Ok(Json(RequestSummary {
        kind: views::api_kind(kind),
        counts: counts.into_iter().map(views::status_count).collect(),
    }))
}

pub async fn move_to_processing(
    Extension(admin): Extension<User>,
    Path((kind, id)): Path<(String, String)>,
    State(state): State<ServerState>,
    Json(payload): Json<MoveToProcessing>,
) -> Result<Json<TransitionOutcome>, ServerError> {
    let (kind, id) = parse_target(&kind, &id)?;
    let settlement = state
        .engine
        .move_to_processing(kind, id, &payload.transaction_id, &admin.username)
        .await?;
    Ok(Json(outcome(settlement)))
}

pub async fn approve(
    Extension(admin): Extension<User>,
    Path((kind, id)): Path<(String, String)>,
    State(state): State<ServerState>,
) -> Result<Json<TransitionOutcome>, ServerError> {
    let (kind, id) = parse_target(&kind, &id)?;
    let settlement = state.engine.approve(kind, id, &admin.username).await?;
    Ok(Json(outcome(settlement)))
}

pub async fn reject(
    Extension(admin): Extension<User>,
    Path((kind, id)): Path<(String, String)>,
    State(state): State<ServerState>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<TransitionOutcome>, ServerError> {
    let (kind, id) = parse_target(&kind, &id)?;
    let settlement = state
        .engine
        .reject(kind, id, &payload.reason, &admin.username)
        .await?;
    Ok(Json(outcome(settlement)))
}
