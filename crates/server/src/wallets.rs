//! Wallet API endpoints.

use api_types::wallet::{BalanceView, WalletView};
use axum::{Extension, Json, extract::State};
use engine::User;

use crate::{ServerError, server::ServerState, views};

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(&user.username).await?;
    Ok(Json(views::wallet(&wallet)))
}

/// The balance exactly as stored; clients display it without recomputing.
pub async fn balance(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let wallet = state.engine.wallet(&user.username).await?;
    Ok(Json(BalanceView {
        balance_minor: wallet.balance.cents(),
        currency: views::currency(wallet.currency),
    }))
}
