//! Authentication handler
//!
//! One endpoint: authenticate-or-register. A missing account is provisioned
//! on first contact; an existing account's credential must match. Success
//! yields a bearer token for the other endpoints.

use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::dto::{AuthRequest, AuthResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /api/auth`
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let identity = state
        .ledger
        .authenticate_or_register(&request.username, &request.password)
        .await?;

    let token = state.identity.issue(&identity.name)?;

    tracing::info!(account = %identity.name, "Authenticated");

    Ok(Json(AuthResponse { token }))
}
