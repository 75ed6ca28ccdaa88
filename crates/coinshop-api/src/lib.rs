//! Coinshop HTTP API
//!
//! Thin axum surface over the ledger engine. The identity gate resolves a
//! bearer token to an account name; handlers hand that name to the engine
//! and map its typed failures onto HTTP statuses. No business rule lives in
//! this crate.
//!
//! # Endpoints
//!
//! | Method | Path             | Auth   | Purpose                      |
//! |--------|------------------|--------|------------------------------|
//! | POST   | `/api/auth`      | none   | authenticate-or-register     |
//! | GET    | `/api/info`      | bearer | balance, inventory, history  |
//! | POST   | `/api/sendCoin`  | bearer | transfer coins               |
//! | GET    | `/api/buy/:item` | bearer | buy one catalog item         |
//! | GET    | `/api/healthz`   | none   | liveness + store ping        |

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use extractors::AuthenticatedUser;
pub use state::AppState;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
