//! API error handling
//!
//! Every ledger and identity failure kind maps onto an HTTP status and a
//! stable machine-readable code; failure bodies are `{code, msg}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coinshop_auth::AuthError;
use coinshop_types::LedgerError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error surface
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Wrong credential")]
    WrongCredential,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::WrongCredential => "WRONG_CREDENTIAL",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::AccountExists(_) => "ACCOUNT_EXISTS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAmount(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,

            Self::Unauthorized | Self::TokenExpired | Self::WrongCredential => {
                StatusCode::UNAUTHORIZED
            }

            Self::AccountNotFound(_) | Self::ItemNotFound(_) => StatusCode::NOT_FOUND,

            Self::AccountExists(_) => StatusCode::CONFLICT,

            Self::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,

            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub msg: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code().to_string(),
            msg: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound { name } => Self::AccountNotFound(name),
            LedgerError::ItemNotFound { name } => Self::ItemNotFound(name),
            LedgerError::AccountExists { name } => Self::AccountExists(name),
            LedgerError::WrongCredential => Self::WrongCredential,
            LedgerError::InvalidAmount { reason } => Self::InvalidAmount(reason),
            LedgerError::InsufficientFunds { .. } => Self::InsufficientFunds,
            LedgerError::Storage { ref message } => {
                tracing::error!(error = %message, "Storage failure");
                Self::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => Self::TokenExpired,
            AuthError::InvalidToken | AuthError::Unauthenticated => Self::Unauthorized,
            AuthError::WeakPassword(reason) => Self::ValidationError(reason),
            other => {
                tracing::error!(error = %other, "Identity gate failure");
                Self::Internal
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message
                            .as_ref()
                            .map(|m| m.as_ref())
                            .unwrap_or("invalid")
                    )
                })
            })
            .collect();
        Self::ValidationError(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::AccountNotFound("bob".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InsufficientFunds.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn ledger_errors_map_onto_statuses() {
        let err: ApiError = LedgerError::InsufficientFunds {
            available: 10,
            required: 60,
        }
        .into();
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");

        let err: ApiError = LedgerError::storage("io").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        // internal detail never reaches the body
        assert_eq!(err.to_string(), "Internal server error");
    }
}
