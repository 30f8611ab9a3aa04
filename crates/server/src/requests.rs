//! User-facing money request endpoints.

use api_types::request::{FundRequestNew, MoneyRequestView, TransferRequestNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{FundRequestCmd, MoneyCents, TransferRequestCmd, User};

use crate::{ServerError, server::ServerState, views};

pub async fn fund_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<FundRequestNew>,
) -> Result<(StatusCode, Json<MoneyRequestView>), ServerError> {
    let cmd = FundRequestCmd::new(
        user.username,
        MoneyCents::new(payload.amount_minor),
        payload.location,
    )
    .description(payload.description);
    let request = state.engine.create_fund_request(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::request(request))))
}

pub async fn transfer_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferRequestNew>,
) -> Result<(StatusCode, Json<MoneyRequestView>), ServerError> {
    let cmd = TransferRequestCmd::new(
        user.username,
        MoneyCents::new(payload.amount_minor),
        payload.account_id,
    )
    .description(payload.description);
    let request = state.engine.create_transfer_request(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::request(request))))
}

/// The caller's own requests of both kinds, newest first.
pub async fn mine(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<MoneyRequestView>>, ServerError> {
    let requests = state.engine.user_requests(&user.username).await?;
    Ok(Json(requests.into_iter().map(views::request).collect()))
}
