//! Custom axum extractors

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::ApiError;
use crate::state::AppState;

/// The verified acting principal, resolved from the `Authorization` header
/// by the identity gate. Handlers that take this extractor require a valid
/// bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Verified account name
    pub name: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let name = state.identity.verify(authorization)?;

        Ok(AuthenticatedUser { name })
    }
}
