//! Bank account API endpoints.

use api_types::bank_account::{BankAccountNew, BankAccountView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{BankAccountCmd, User};

use crate::{ServerError, server::ServerState, views};

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BankAccountView>>, ServerError> {
    let accounts = state.engine.bank_accounts(&user.username).await?;
    Ok(Json(accounts.into_iter().map(views::bank_account).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BankAccountNew>,
) -> Result<(StatusCode, Json<BankAccountView>), ServerError> {
    let account = state
        .engine
        .add_bank_account(BankAccountCmd {
            user_id: user.username,
            account_holder_name: payload.account_holder_name,
            account_number: payload.account_number,
            ifsc_code: payload.ifsc_code,
            bank_name: payload.bank_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(views::bank_account(account))))
}
