//! Purchase handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /api/buy/:item` — buy one catalog item for the authenticated
/// account.
pub async fn buy_item(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(item): Path<String>,
) -> ApiResult<StatusCode> {
    state.ledger.purchase(&user.name, &item).await?;

    Ok(StatusCode::OK)
}
