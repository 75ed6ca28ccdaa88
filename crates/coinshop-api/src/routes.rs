//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Routes under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth", post(handlers::auth::authenticate))
        .route("/info", get(handlers::account::info))
        .route("/sendCoin", post(handlers::transfer::send_coin))
        .route("/buy/:item", get(handlers::shop::buy_item))
        .route("/healthz", get(handlers::health::healthz))
}
