//! Coin transfer handler

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::dto::SendCoinRequest;
use crate::error::ApiResult;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `POST /api/sendCoin` — move coins from the authenticated account to
/// another account.
pub async fn send_coin(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(request): Json<SendCoinRequest>,
) -> ApiResult<StatusCode> {
    request.validate()?;

    state
        .ledger
        .transfer(&user.name, &request.to_user, request.amount)
        .await?;

    Ok(StatusCode::OK)
}
