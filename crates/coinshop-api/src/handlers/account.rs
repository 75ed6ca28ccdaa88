//! Account info handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::InfoResponse;
use crate::error::ApiResult;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /api/info` — balance, inventory, and transfer history for the
/// authenticated account, all observed at one logical point in time.
pub async fn info(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<InfoResponse>> {
    let view = state.ledger.account_view(&user.name).await?;

    Ok(Json(InfoResponse::from(view)))
}
